use crate::stats::DEFAULT_WORDS_PER_MINUTE;

/// Where the word count of a surface is displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusScope {
    /// Each surface writes to its own `word-count-<suffix>` element
    #[default]
    PerSurface,
    /// All surfaces share the fixed `.editor-header .text-sm` element
    Shared,
}

/// Tunables for one editing surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub placeholder_text: String,
    pub code_block_placeholder: String,
    /// Pre-filled URL in the link prompt. Submitting it unchanged cancels.
    pub link_default: String,
    pub words_per_minute: usize,
    /// Inserted when Tab is pressed
    pub tab_text: String,
    pub status_scope: StatusScope,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            placeholder_text: "Start writing your story...".to_string(),
            code_block_placeholder: "Your code here...".to_string(),
            link_default: "https://".to_string(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            tab_text: "    ".to_string(),
            status_scope: StatusScope::PerSurface,
        }
    }
}
