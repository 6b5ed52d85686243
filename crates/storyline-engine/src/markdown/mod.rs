//! Markdown projection of the document tree.
//!
//! [`to_markdown`] is the outbound projection pushed to the host after every
//! mutation. [`Document::from_markdown`](crate::editing::Document::from_markdown)
//! loads existing content when a surface is attached.

mod load;
mod serialize;

pub use serialize::{inline_markdown, to_markdown};
