pub mod editing;
pub mod error;
pub mod io;
pub mod markdown;
pub mod render;
pub mod settings;
pub mod stats;
pub mod surface;

// Re-export key types for easier usage
pub use editing::*;
pub use error::EditorError;
pub use markdown::to_markdown;
pub use render::to_html;
pub use settings::{EditorSettings, StatusScope};
pub use stats::{ReadingEstimate, estimate};
pub use surface::{
    HostMessage, Key, KeyPress, Sinks, StatusTarget, Surface, SurfaceEvent, SurfaceHost,
};
