use std::ops::Range;

use super::document::{
    Block, BlockId, BlockKind, Document, Inline, LeafContent, LeafContentMut, ListItem,
};
use super::inline;
use super::patch::Patch;
use super::selection::{Position, Selection};

/// Text editing commands raised by typing, key presses and paste.
///
/// Formatting commands live in [`super::format`]; these are the primitive
/// edits the platform would otherwise perform on a contenteditable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Insert text at the selection, replacing any selected content
    InsertText { text: String },
    /// Split the current leaf at the caret (Enter)
    InsertParagraph,
    /// Insert a newline inside the current leaf (Shift+Enter)
    InsertLineBreak,
    /// Delete the selection or the character before the caret (Backspace)
    DeleteBackward,
}

impl Document {
    /// Apply an editing command at `selection`.
    ///
    /// Returns `None` and leaves the document untouched when the command has no
    /// effect (for example Backspace at the very start of the document).
    pub fn apply(&mut self, cmd: Cmd, selection: &Selection) -> Option<Patch> {
        match cmd {
            Cmd::InsertText { text } => self.insert_text(selection, &text),
            Cmd::InsertLineBreak => self.insert_text(selection, "\n"),
            Cmd::InsertParagraph => self.insert_paragraph(selection),
            Cmd::DeleteBackward => self.delete_backward(selection),
        }
    }

    fn insert_text(&mut self, selection: &Selection, text: &str) -> Option<Patch> {
        if text.is_empty() && selection.is_collapsed() {
            return None;
        }
        self.transaction(|doc| {
            let caret = doc.collapse_selection(selection)?;
            let location = doc.locate(caret.leaf)?;

            if matches!(doc.leaf(caret.leaf)?, LeafContent::Placeholder(_)) {
                let paragraph = Block::paragraph(vec![Inline::text(text)]);
                let id = paragraph.id;
                doc.replace_block(location.block, paragraph);
                doc.placeholder = false;
                return Some(doc.patch(vec![id], Selection::caret(id, text.len())));
            }

            match doc.leaf_mut(caret.leaf)? {
                LeafContentMut::Inline(content) => {
                    *content = inline::insert_text(content, caret.offset, text);
                }
                LeafContentMut::Code(code) => code.insert_str(caret.offset, text),
                LeafContentMut::Placeholder => return None,
            }
            let block = doc.blocks[location.block].id;
            Some(doc.patch(
                vec![block],
                Selection::caret(caret.leaf, caret.offset + text.len()),
            ))
        })
    }

    fn insert_paragraph(&mut self, selection: &Selection) -> Option<Patch> {
        self.transaction(|doc| {
            let caret = doc.collapse_selection(selection)?;
            let location = doc.locate(caret.leaf)?;
            let block_id = doc.blocks[location.block].id;

            if let Some(item) = location.item {
                let BlockKind::List { items, .. } = &mut doc.blocks[location.block].kind else {
                    return None;
                };
                let (head, tail) = inline::split(&items[item].content, caret.offset);
                items[item].content = head;
                let next = ListItem::new(tail);
                let next_id = next.id;
                items.insert(item + 1, next);
                return Some(doc.patch(vec![block_id], Selection::caret(next_id, 0)));
            }

            let tail = match &mut doc.blocks[location.block].kind {
                BlockKind::Paragraph(content)
                | BlockKind::Heading { content, .. }
                | BlockKind::BlockQuote(content) => {
                    let (head, tail) = inline::split(content, caret.offset);
                    *content = head;
                    Some(tail)
                }
                BlockKind::CodeBlock(code) => {
                    code.insert(caret.offset, '\n');
                    None
                }
                BlockKind::Placeholder(_) | BlockKind::List { .. } => return None,
            };

            match tail {
                Some(tail) => {
                    let paragraph = Block::paragraph(tail);
                    let id = paragraph.id;
                    doc.insert_block(location.block + 1, paragraph);
                    Some(doc.patch(vec![block_id, id], Selection::caret(id, 0)))
                }
                None => Some(doc.patch(
                    vec![block_id],
                    Selection::caret(caret.leaf, caret.offset + 1),
                )),
            }
        })
    }

    fn delete_backward(&mut self, selection: &Selection) -> Option<Patch> {
        self.transaction(|doc| {
            let (start, end) = selection.ordered(doc)?;
            if start != end {
                let caret = doc.delete_between(start, end)?;
                let block = doc.enclosing_block(caret.leaf)?.id;
                return Some(doc.patch(vec![block], Selection::caret(caret.leaf, caret.offset)));
            }

            if start.offset > 0 {
                let text = doc.leaf_text(start.leaf)?;
                let previous = text[..start.offset].chars().next_back()?;
                let from = start.offset - previous.len_utf8();
                doc.delete_in_leaf(start.leaf, from..start.offset)?;
                let block = doc.enclosing_block(start.leaf)?.id;
                return Some(doc.patch(vec![block], Selection::caret(start.leaf, from)));
            }

            // At the start of a leaf: merge it into the previous one
            let index = doc.leaf_index(start.leaf)?;
            let previous = doc.leaves()[index.checked_sub(1)?];
            let offset = doc.leaf_len(previous)?;
            let body = doc.take_leaf(start.leaf)?;
            if !doc.append_to_leaf(previous, body) {
                return None;
            }
            let block = doc.enclosing_block(previous)?.id;
            Some(doc.patch(vec![block], Selection::caret(previous, offset)))
        })
    }

    /// Delete selected content and return the collapsed caret
    fn collapse_selection(&mut self, selection: &Selection) -> Option<Position> {
        let (start, end) = selection.ordered(self)?;
        if start == end {
            return Some(start);
        }
        self.delete_between(start, end)
    }

    fn delete_between(&mut self, start: Position, end: Position) -> Option<Position> {
        if start.leaf == end.leaf {
            self.delete_in_leaf(start.leaf, start.offset..end.offset)?;
            return Some(start);
        }

        let leaves = self.leaves();
        let first = leaves.iter().position(|leaf| *leaf == start.leaf)?;
        let last = leaves.iter().position(|leaf| *leaf == end.leaf)?;
        let first_len = self.leaf_len(start.leaf)?;

        self.delete_in_leaf(start.leaf, start.offset..first_len)?;
        self.delete_in_leaf(end.leaf, 0..end.offset)?;
        for leaf in &leaves[first + 1..last] {
            self.take_leaf(*leaf)?;
        }
        let tail = self.take_leaf(end.leaf)?;
        self.append_to_leaf(start.leaf, tail).then_some(start)
    }

    fn delete_in_leaf(&mut self, leaf: BlockId, range: Range<usize>) -> Option<()> {
        match self.leaf_mut(leaf)? {
            LeafContentMut::Inline(content) => {
                *content = inline::delete_range(content, range);
            }
            LeafContentMut::Code(code) => {
                let start = inline::floor_char_boundary(code, range.start);
                let end = inline::floor_char_boundary(code, range.end);
                code.replace_range(start..end, "");
            }
            LeafContentMut::Placeholder => return None,
        }
        Some(())
    }
}
