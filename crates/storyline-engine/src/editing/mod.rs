/*!
 * # Editing Core
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the Document tree
 * - The document is an explicit tree of **Blocks** (paragraphs, headings,
 *   lists, blockquotes, code blocks) holding **Inline** content
 * - Markdown (`crate::markdown`) and HTML (`crate::render`) are one-way
 *   projections of the tree; nothing is ever read back from a display
 *
 * ### 2. Command-Based Editing
 * - Text edits are **Commands** (`Cmd`) applied against a selection
 * - Formatting is a **FormatCommand** with the wire names used by the
 *   toolbar (`bold`, `h1`, `codeblock`, ...)
 * - Every mutation returns a **Patch** naming the changed blocks, the new
 *   selection and the document version; a no-op returns `None` and leaves
 *   the tree untouched
 *
 * ### 3. Stable Block IDs
 * - Every block and list item carries a UUID `BlockId`
 * - Structural rewrites mint fresh ids so stale selections are detectable
 *
 * ### 4. Shortcuts
 * - After text input, `Document::apply_shortcut` turns `# `, `- `, `1. `
 *   and `> ` prefixes into headings, lists and quotes
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, `Block`, `Inline` and leaf addressing
 * - **`commands`**: `Cmd` and the text editing primitives
 * - **`format`**: `FormatCommand`, `Prompter` and the formatter
 * - **`shortcuts`**: Markdown-style shortcut recognition
 * - **`selection`**: positions, selections, the tracker and caret motion
 * - **`patch`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use storyline_engine::editing::*;
 * use storyline_engine::markdown::to_markdown;
 *
 * let mut doc = Document::new();
 * let leaf = doc.first_leaf().unwrap();
 *
 * let patch = doc
 *     .apply(Cmd::InsertText { text: "# Hi".to_string() }, &Selection::caret(leaf, 0))
 *     .unwrap();
 * doc.apply_shortcut(patch.new_selection.focus);
 *
 * assert_eq!(to_markdown(&doc), "# Hi");
 * ```
 */

pub mod commands;
pub mod document;
pub mod format;
pub(crate) mod inline;
pub mod patch;
pub mod selection;
pub mod shortcuts;

pub use commands::Cmd;
pub use document::{
    Block, BlockId, BlockKind, Conversion, Document, HeadingLevel, Inline, LeafContent, ListItem,
    ListKind,
};
pub use format::{FormatCommand, Prompter};
pub use inline::Mark;
pub use patch::Patch;
pub use selection::{Motion, Position, Selection, SelectionTracker};
pub use shortcuts::{ShortcutMatch, detect};
