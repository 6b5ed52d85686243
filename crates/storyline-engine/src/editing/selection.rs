use super::document::{BlockId, Document};
use super::inline::floor_char_boundary;

/// A caret position: a leaf and a byte offset into its plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub leaf: BlockId,
    pub offset: usize,
}

impl Position {
    pub fn new(leaf: BlockId, offset: usize) -> Self {
        Self { leaf, offset }
    }

    /// Clamp the offset against the current document.
    ///
    /// Returns `None` when the leaf no longer exists.
    pub fn clamped(&self, doc: &Document) -> Option<Position> {
        let text = doc.leaf_text(self.leaf)?;
        Some(Position::new(self.leaf, floor_char_boundary(&text, self.offset)))
    }
}

/// Anchor/focus range over the document.
///
/// The host owns the live selection; the core works on copies and hands new
/// selections back through [`crate::surface::SurfaceHost::apply_selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(leaf: BlockId, offset: usize) -> Self {
        let position = Position::new(leaf, offset);
        Self::new(position, position)
    }

    /// Selection spanning `start..end` inside one leaf
    pub fn within(leaf: BlockId, start: usize, end: usize) -> Self {
        Self::new(Position::new(leaf, start), Position::new(leaf, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The leaf holding both ends, if they share one
    pub fn single_leaf(&self) -> Option<BlockId> {
        (self.anchor.leaf == self.focus.leaf).then_some(self.anchor.leaf)
    }

    /// Start and end in document order, clamped against the document
    pub fn ordered(&self, doc: &Document) -> Option<(Position, Position)> {
        let anchor = self.anchor.clamped(doc)?;
        let focus = self.focus.clamped(doc)?;
        let anchor_index = doc.leaf_index(anchor.leaf)?;
        let focus_index = doc.leaf_index(focus.leaf)?;
        if (anchor_index, anchor.offset) <= (focus_index, focus.offset) {
            Some((anchor, focus))
        } else {
            Some((focus, anchor))
        }
    }

    pub fn clamped(&self, doc: &Document) -> Option<Selection> {
        Some(Selection::new(
            self.anchor.clamped(doc)?,
            self.focus.clamped(doc)?,
        ))
    }
}

/// Keeps the host's current selection and the last snapshot taken before a mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    current: Option<Selection>,
    last_known: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Selection> {
        self.current
    }

    pub fn last_known(&self) -> Option<Selection> {
        self.last_known
    }

    /// Record a selection reported by (or applied to) the host
    pub fn set_current(&mut self, selection: Option<Selection>) {
        self.current = selection;
    }

    /// Remember the current selection. Records nothing when no range is active.
    pub fn snapshot(&mut self) {
        if let Some(selection) = self.current {
            self.last_known = Some(selection);
        }
    }

    /// The last snapshot, clamped to the document, made current again.
    ///
    /// `None` when nothing was snapshotted or its leaf has since been replaced.
    pub fn restore(&mut self, doc: &Document) -> Option<Selection> {
        let restored = self.last_known?.clamped(doc)?;
        self.current = Some(restored);
        Some(restored)
    }

    /// Collapse the selection to the end of a leaf's text
    pub fn move_cursor_to_end(&mut self, doc: &Document, leaf: BlockId) -> Option<Selection> {
        let selection = Selection::caret(leaf, doc.leaf_len(leaf)?);
        self.current = Some(selection);
        Some(selection)
    }
}

/// Caret motions for hosts that drive their own cursor keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    LineStart,
    LineEnd,
    PreviousLeaf,
    NextLeaf,
}

/// Move a caret through the document. Positions at the document edges stay put.
pub fn step(doc: &Document, position: Position, motion: Motion) -> Option<Position> {
    let position = position.clamped(doc)?;
    let text = doc.leaf_text(position.leaf)?;
    let leaves = doc.leaves();
    let index = leaves.iter().position(|leaf| *leaf == position.leaf)?;

    let moved = match motion {
        Motion::Left => match text[..position.offset].chars().next_back() {
            Some(c) => Position::new(position.leaf, position.offset - c.len_utf8()),
            None => match index.checked_sub(1).map(|i| leaves[i]) {
                Some(previous) => Position::new(previous, doc.leaf_len(previous)?),
                None => position,
            },
        },
        Motion::Right => match text[position.offset..].chars().next() {
            Some(c) => Position::new(position.leaf, position.offset + c.len_utf8()),
            None => match leaves.get(index + 1) {
                Some(next) => Position::new(*next, 0),
                None => position,
            },
        },
        Motion::LineStart => Position::new(position.leaf, 0),
        Motion::LineEnd => Position::new(position.leaf, text.len()),
        Motion::PreviousLeaf => match index.checked_sub(1).map(|i| leaves[i]) {
            Some(previous) => Position::new(previous, position.offset).clamped(doc)?,
            None => Position::new(position.leaf, 0),
        },
        Motion::NextLeaf => match leaves.get(index + 1) {
            Some(next) => Position::new(*next, position.offset).clamped(doc)?,
            None => Position::new(position.leaf, text.len()),
        },
    };
    Some(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::document::{Block, Inline};

    fn two_paragraphs() -> (Document, BlockId, BlockId) {
        let doc = Document::from_blocks(vec![
            Block::paragraph(vec![Inline::text("héllo")]),
            Block::paragraph(vec![Inline::text("world")]),
        ]);
        let leaves = doc.leaves();
        (doc, leaves[0], leaves[1])
    }

    #[test]
    fn test_snapshot_without_selection_records_nothing() {
        let mut tracker = SelectionTracker::new();
        tracker.snapshot();
        assert_eq!(tracker.last_known(), None);
    }

    #[test]
    fn test_restore_reapplies_last_snapshot() {
        let (doc, first, _) = two_paragraphs();
        let mut tracker = SelectionTracker::new();
        tracker.set_current(Some(Selection::caret(first, 3)));
        tracker.snapshot();
        tracker.set_current(None);

        assert_eq!(tracker.restore(&doc), Some(Selection::caret(first, 3)));
        assert_eq!(tracker.current(), Some(Selection::caret(first, 3)));
    }

    #[test]
    fn test_restore_is_noop_for_replaced_leaf() {
        let (doc, _, _) = two_paragraphs();
        let mut tracker = SelectionTracker::new();
        tracker.set_current(Some(Selection::caret(BlockId::new(), 0)));
        tracker.snapshot();
        assert_eq!(tracker.restore(&doc), None);
    }

    #[test]
    fn test_move_cursor_to_end() {
        let (doc, _, second) = two_paragraphs();
        let mut tracker = SelectionTracker::new();
        let selection = tracker.move_cursor_to_end(&doc, second).unwrap();
        assert_eq!(selection, Selection::caret(second, 5));
        assert!(selection.is_collapsed());
    }

    #[test]
    fn test_ordered_swaps_backwards_selection() {
        let (doc, first, second) = two_paragraphs();
        let backwards = Selection::new(Position::new(second, 2), Position::new(first, 1));
        let (start, end) = backwards.ordered(&doc).unwrap();
        assert_eq!(start, Position::new(first, 1));
        assert_eq!(end, Position::new(second, 2));
    }

    #[test]
    fn test_clamp_to_char_boundary() {
        let (doc, first, _) = two_paragraphs();
        // Offset 2 is inside "é"
        assert_eq!(
            Position::new(first, 2).clamped(&doc),
            Some(Position::new(first, 1))
        );
        assert_eq!(
            Position::new(first, 99).clamped(&doc),
            Some(Position::new(first, 6))
        );
    }

    #[test]
    fn test_step_crosses_leaves() {
        let (doc, first, second) = two_paragraphs();
        let end_of_first = Position::new(first, 6);
        assert_eq!(
            step(&doc, end_of_first, Motion::Right),
            Some(Position::new(second, 0))
        );
        assert_eq!(
            step(&doc, Position::new(second, 0), Motion::Left),
            Some(end_of_first)
        );
        assert_eq!(
            step(&doc, Position::new(first, 3), Motion::Left),
            Some(Position::new(first, 1))
        );
        assert_eq!(
            step(&doc, Position::new(first, 0), Motion::Left),
            Some(Position::new(first, 0))
        );
    }
}
