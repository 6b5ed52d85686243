use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::inline;
use super::patch::Patch;
use super::selection::Selection;

/// Stable identifier for a block or list item.
///
/// Structural rewrites (paragraph to heading, paragraph to list) always mint a
/// new id, so a selection that still points at the old id is detectably stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Heading depth supported by the editor (H1 to H3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn depth(self) -> usize {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Levels deeper than three clamp to H3.
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            0 => None,
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            _ => Some(HeadingLevel::H3),
        }
    }

    /// The Markdown marker for this level (`#`, `##`, `###`)
    pub fn marker(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "#",
            HeadingLevel::H2 => "##",
            HeadingLevel::H3 => "###",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// Inline content held by paragraphs, headings, blockquotes and list items.
///
/// After any edit the tree is kept in canonical form: bold wraps italic, which
/// wraps the leaf atom (text, code or link).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Code(String),
    Link { href: String, text: String },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(text.into())
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::Code(text) | Inline::Link { text, .. } => {
                out.push_str(text)
            }
            Inline::Bold(children) | Inline::Italic(children) => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

/// Concatenated text of a run of inline nodes, with all formatting stripped
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.push_plain_text(&mut out);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: BlockId,
    pub content: Vec<Inline>,
}

impl ListItem {
    pub fn new(content: Vec<Inline>) -> Self {
        Self {
            id: BlockId::new(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph(Vec<Inline>),
    /// Prompt shown while the surface has no user content. Never serialized.
    Placeholder(String),
    Heading {
        level: HeadingLevel,
        content: Vec<Inline>,
    },
    BlockQuote(Vec<Inline>),
    CodeBlock(String),
    List {
        kind: ListKind,
        items: Vec<ListItem>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::new(),
            kind,
        }
    }

    pub fn paragraph(content: Vec<Inline>) -> Self {
        Self::new(BlockKind::Paragraph(content))
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Placeholder(text.into()))
    }

    pub fn heading(level: HeadingLevel, content: Vec<Inline>) -> Self {
        Self::new(BlockKind::Heading { level, content })
    }

    pub fn quote(content: Vec<Inline>) -> Self {
        Self::new(BlockKind::BlockQuote(content))
    }

    pub fn code_block(text: impl Into<String>) -> Self {
        Self::new(BlockKind::CodeBlock(text.into()))
    }

    pub fn list(kind: ListKind, items: Vec<ListItem>) -> Self {
        Self::new(BlockKind::List { kind, items })
    }
}

/// Structural rewrite of a paragraph-like block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Heading(HeadingLevel),
    List(ListKind),
    Quote,
}

/// Where a leaf lives: the top-level block index and, for list items, the item index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafLocation {
    pub block: usize,
    pub item: Option<usize>,
}

/// Read access to the text-bearing content of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafContent<'a> {
    Inline(&'a [Inline]),
    Code(&'a str),
    Placeholder(&'a str),
}

impl LeafContent<'_> {
    pub fn text(&self) -> String {
        match self {
            LeafContent::Inline(inlines) => plain_text(inlines),
            LeafContent::Code(text) | LeafContent::Placeholder(text) => text.to_string(),
        }
    }
}

pub(crate) enum LeafContentMut<'a> {
    Inline(&'a mut Vec<Inline>),
    Code(&'a mut String),
    Placeholder,
}

/// Content detached from the tree when a leaf is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LeafBody {
    Inline(Vec<Inline>),
    Code(String),
}

/// The editable document: an ordered tree of blocks.
///
/// The tree is the single source of truth for the surface. Markdown and HTML
/// are one-way projections of it (see [`crate::markdown`] and [`crate::render`]).
/// A document always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    /// True while the only content is the seeded placeholder prompt
    pub(crate) placeholder: bool,
    /// Incremented on every mutation
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding one empty paragraph
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self {
            blocks,
            placeholder: false,
            version: 0,
        };
        doc.ensure_not_empty();
        doc
    }

    /// A document showing only the placeholder prompt
    pub fn with_placeholder(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![Block::placeholder(text)],
            placeholder: true,
            version: 0,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Leaf ids in document order
    pub fn leaves(&self) -> Vec<BlockId> {
        let mut ids = Vec::new();
        for block in &self.blocks {
            match &block.kind {
                BlockKind::List { items, .. } => ids.extend(items.iter().map(|item| item.id)),
                _ => ids.push(block.id),
            }
        }
        ids
    }

    pub fn leaf_index(&self, id: BlockId) -> Option<usize> {
        self.leaves().iter().position(|leaf| *leaf == id)
    }

    pub fn first_leaf(&self) -> Option<BlockId> {
        self.leaves().first().copied()
    }

    pub fn last_leaf(&self) -> Option<BlockId> {
        self.leaves().last().copied()
    }

    pub fn locate(&self, id: BlockId) -> Option<LeafLocation> {
        for (index, block) in self.blocks.iter().enumerate() {
            match &block.kind {
                BlockKind::List { items, .. } => {
                    if let Some(item) = items.iter().position(|item| item.id == id) {
                        return Some(LeafLocation {
                            block: index,
                            item: Some(item),
                        });
                    }
                }
                _ if block.id == id => {
                    return Some(LeafLocation {
                        block: index,
                        item: None,
                    });
                }
                _ => {}
            }
        }
        None
    }

    pub fn leaf(&self, id: BlockId) -> Option<LeafContent<'_>> {
        let location = self.locate(id)?;
        let block = &self.blocks[location.block];
        let content = match (&block.kind, location.item) {
            (BlockKind::List { items, .. }, Some(item)) => LeafContent::Inline(&items[item].content),
            (BlockKind::Paragraph(content), None)
            | (BlockKind::Heading { content, .. }, None)
            | (BlockKind::BlockQuote(content), None) => LeafContent::Inline(content),
            (BlockKind::CodeBlock(text), None) => LeafContent::Code(text),
            (BlockKind::Placeholder(text), None) => LeafContent::Placeholder(text),
            _ => return None,
        };
        Some(content)
    }

    pub(crate) fn leaf_mut(&mut self, id: BlockId) -> Option<LeafContentMut<'_>> {
        let location = self.locate(id)?;
        let block = &mut self.blocks[location.block];
        let content = match (&mut block.kind, location.item) {
            (BlockKind::List { items, .. }, Some(item)) => {
                LeafContentMut::Inline(&mut items[item].content)
            }
            (BlockKind::Paragraph(content), None)
            | (BlockKind::Heading { content, .. }, None)
            | (BlockKind::BlockQuote(content), None) => LeafContentMut::Inline(content),
            (BlockKind::CodeBlock(text), None) => LeafContentMut::Code(text),
            (BlockKind::Placeholder(_), None) => LeafContentMut::Placeholder,
            _ => return None,
        };
        Some(content)
    }

    /// Inline content of a leaf, or `None` for code blocks and placeholders
    pub fn inline_content(&self, id: BlockId) -> Option<&[Inline]> {
        match self.leaf(id)? {
            LeafContent::Inline(inlines) => Some(inlines),
            _ => None,
        }
    }

    pub fn leaf_text(&self, id: BlockId) -> Option<String> {
        self.leaf(id).map(|leaf| leaf.text())
    }

    pub fn leaf_len(&self, id: BlockId) -> Option<usize> {
        self.leaf_text(id).map(|text| text.len())
    }

    /// The top-level block containing a leaf
    pub fn enclosing_block(&self, id: BlockId) -> Option<&Block> {
        self.locate(id).map(|location| &self.blocks[location.block])
    }

    /// User-visible text, one line per leaf. The placeholder prompt contributes nothing.
    pub fn text_content(&self) -> String {
        let mut lines = Vec::new();
        for id in self.leaves() {
            match self.leaf(id) {
                Some(LeafContent::Placeholder(_)) | None => {}
                Some(leaf) => lines.push(leaf.text()),
            }
        }
        lines.join("\n")
    }

    /// True when the document holds no visible user text
    pub fn is_blank(&self) -> bool {
        self.text_content().trim().is_empty()
    }

    /// Swap the block at `index` for `replacement`, keeping everything else in place
    pub(crate) fn replace_block(&mut self, index: usize, replacement: Block) {
        self.blocks[index] = replacement;
    }

    pub(crate) fn splice_blocks(&mut self, index: usize, replacement: Vec<Block>) {
        self.blocks.splice(index..=index, replacement);
        self.ensure_not_empty();
    }

    pub(crate) fn insert_block(&mut self, index: usize, block: Block) {
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
    }

    /// Detach a leaf from the tree. Lists emptied by the removal are dropped.
    pub(crate) fn take_leaf(&mut self, id: BlockId) -> Option<LeafBody> {
        let location = self.locate(id)?;
        let body = match location.item {
            Some(item) => {
                let BlockKind::List { items, .. } = &mut self.blocks[location.block].kind else {
                    return None;
                };
                let removed = items.remove(item);
                if items.is_empty() {
                    self.blocks.remove(location.block);
                }
                LeafBody::Inline(removed.content)
            }
            None => match self.blocks.remove(location.block).kind {
                BlockKind::Paragraph(content)
                | BlockKind::Heading { content, .. }
                | BlockKind::BlockQuote(content) => LeafBody::Inline(content),
                BlockKind::CodeBlock(text) => LeafBody::Code(text),
                BlockKind::Placeholder(_) => LeafBody::Inline(Vec::new()),
                BlockKind::List { .. } => return None,
            },
        };
        self.ensure_not_empty();
        Some(body)
    }

    /// Append detached content to the end of a leaf.
    ///
    /// Content crossing between code and inline leaves is carried over as plain text.
    pub(crate) fn append_to_leaf(&mut self, id: BlockId, body: LeafBody) -> bool {
        match (self.leaf_mut(id), body) {
            (Some(LeafContentMut::Inline(content)), LeafBody::Inline(tail)) => {
                let merged = inline::concat(content, &tail);
                *content = merged;
                true
            }
            (Some(LeafContentMut::Inline(content)), LeafBody::Code(text)) => {
                let merged = inline::concat(content, &[Inline::Text(text)]);
                *content = merged;
                true
            }
            (Some(LeafContentMut::Code(code)), LeafBody::Inline(tail)) => {
                code.push_str(&plain_text(&tail));
                true
            }
            (Some(LeafContentMut::Code(code)), LeafBody::Code(text)) => {
                code.push_str(&text);
                true
            }
            _ => false,
        }
    }

    /// Run an edit against a draft copy and commit it only when it produces a patch.
    ///
    /// Multi-step edits either land completely or leave the document untouched.
    pub(crate) fn transaction(
        &mut self,
        edit: impl FnOnce(&mut Document) -> Option<Patch>,
    ) -> Option<Patch> {
        let mut draft = self.clone();
        let patch = edit(&mut draft)?;
        *self = draft;
        Some(patch)
    }

    pub(crate) fn patch(&mut self, changed: Vec<BlockId>, new_selection: Selection) -> Patch {
        let version = self.bump_version();
        Patch {
            changed,
            new_selection,
            version,
        }
    }

    /// Replace a top-level block with a heading, one-item list or blockquote
    /// holding `content`, and put the caret at the end of the new leaf.
    pub(crate) fn rewrite_block(
        &mut self,
        index: usize,
        conversion: Conversion,
        content: Vec<Inline>,
    ) -> Patch {
        let end = plain_text(&content).len();
        let (block, leaf) = match conversion {
            Conversion::Heading(level) => {
                let block = Block::heading(level, content);
                let leaf = block.id;
                (block, leaf)
            }
            Conversion::List(kind) => {
                let item = ListItem::new(content);
                let leaf = item.id;
                (Block::list(kind, vec![item]), leaf)
            }
            Conversion::Quote => {
                let block = Block::quote(content);
                let leaf = block.id;
                (block, leaf)
            }
        };
        let changed = vec![block.id];
        self.replace_block(index, block);
        self.patch(changed, Selection::caret(leaf, end))
    }

    /// Swap the placeholder block for an empty paragraph. Every other block stays.
    pub(crate) fn clear_placeholder(&mut self) -> BlockId {
        let paragraph = Block::paragraph(Vec::new());
        let id = paragraph.id;
        let mut paragraph = Some(paragraph);
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for block in std::mem::take(&mut self.blocks) {
            if matches!(block.kind, BlockKind::Placeholder(_)) {
                blocks.extend(paragraph.take());
            } else {
                blocks.push(block);
            }
        }
        if let Some(paragraph) = paragraph {
            blocks.insert(0, paragraph);
        }
        self.blocks = blocks;
        self.placeholder = false;
        self.bump_version();
        id
    }

    pub(crate) fn seed_placeholder(&mut self, text: &str) -> BlockId {
        let placeholder = Block::placeholder(text);
        let id = placeholder.id;
        self.blocks = vec![placeholder];
        self.placeholder = true;
        self.bump_version();
        id
    }

    fn ensure_not_empty(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::paragraph(Vec::new()));
        }
    }
}
