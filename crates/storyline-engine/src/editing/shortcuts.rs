use std::sync::OnceLock;

use regex::Regex;

use super::document::{BlockKind, Conversion, Document, HeadingLevel, ListKind};
use super::inline;
use super::patch::Patch;
use super::selection::{Position, Selection};

struct Shortcut {
    pattern: Regex,
    conversion: Conversion,
}

/// Shortcut patterns in the order they are tried: headings, lists, quote
fn shortcuts() -> &'static [Shortcut] {
    static SHORTCUTS: OnceLock<Vec<Shortcut>> = OnceLock::new();
    SHORTCUTS.get_or_init(|| {
        [
            (r"^# (.+)", Conversion::Heading(HeadingLevel::H1)),
            (r"^## (.+)", Conversion::Heading(HeadingLevel::H2)),
            (r"^### (.+)", Conversion::Heading(HeadingLevel::H3)),
            (r"^- (.+)", Conversion::List(ListKind::Unordered)),
            (r"^\* (.+)", Conversion::List(ListKind::Unordered)),
            (r"^\d+\. (.+)", Conversion::List(ListKind::Ordered)),
            (r"^> (.+)", Conversion::Quote),
        ]
        .into_iter()
        .map(|(pattern, conversion)| Shortcut {
            pattern: Regex::new(pattern).expect("Invalid shortcut regex"),
            conversion,
        })
        .collect()
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutMatch {
    pub conversion: Conversion,
    /// Text after the marker, up to the end of its line
    pub content: String,
    /// Byte length of the marker and its space
    pub marker_len: usize,
}

/// Recognize a Markdown-style marker at the start of `text`.
///
/// Fires only once the cursor is past the marker and its space, so typing the
/// marker itself never converts anything.
pub fn detect(text: &str, cursor: usize) -> Option<ShortcutMatch> {
    shortcuts().iter().find_map(|shortcut| {
        let captures = shortcut.pattern.captures(text)?;
        let content = captures.get(1)?;
        (cursor > content.start()).then(|| ShortcutMatch {
            conversion: shortcut.conversion,
            content: content.as_str().to_string(),
            marker_len: content.start(),
        })
    })
}

impl Document {
    /// Run shortcut recognition for the caret at `cursor`.
    ///
    /// Only paragraphs are considered, and only when the caret sits in plain
    /// text that is a direct child of the paragraph.
    pub fn apply_shortcut(&mut self, cursor: Position) -> Option<Patch> {
        let cursor = cursor.clamped(self)?;
        let location = self.locate(cursor.leaf)?;
        let BlockKind::Paragraph(content) = &self.blocks[location.block].kind else {
            return None;
        };
        let (text, local, start) = inline::direct_text_at(content, cursor.offset)?;
        let found = detect(text, local)?;

        // Drop only the marker; siblings and text after a line break stay
        let marker = start..start + found.marker_len;
        let content = inline::delete_range(content, marker.clone());
        log::debug!("shortcut {:?} fired in {}", found.conversion, cursor.leaf);

        let mut patch = self.rewrite_block(location.block, found.conversion, content);
        let leaf = patch.new_selection.focus.leaf;
        patch.new_selection = Selection::caret(leaf, cursor.offset - marker.len());
        Some(patch)
    }
}
