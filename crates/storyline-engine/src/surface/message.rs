use serde::{Deserialize, Serialize};

use crate::editing::FormatCommand;
use crate::error::EditorError;

/// Messages pushed to a surface by the host's command dispatcher.
///
/// Wire form: `{"kind": "format_text", "payload": {"type": "bold", "editor_id": "editor-1"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum HostMessage {
    FormatText {
        #[serde(rename = "type")]
        command: FormatCommand,
        editor_id: String,
    },
}

impl HostMessage {
    pub fn parse(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }
}
