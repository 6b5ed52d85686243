use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;
use crate::markdown::to_markdown;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a Markdown file as a string
pub fn read_markdown(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Serialize a document and write it, creating parent directories
pub fn write_document(path: &Path, doc: &Document) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut markdown = to_markdown(doc);
    if !markdown.is_empty() {
        markdown.push('\n');
    }
    fs::write(path, markdown).map_err(IoError::Io)
}
