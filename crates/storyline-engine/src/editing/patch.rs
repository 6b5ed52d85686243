use super::document::BlockId;
use super::selection::Selection;

/// Result of a mutation applied to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Top-level blocks created or rewritten by the mutation
    pub changed: Vec<BlockId>,
    /// Where the host should place the caret afterwards
    pub new_selection: Selection,
    pub version: u64,
}
