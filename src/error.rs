use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MutationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Grammar error: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Failed to restore {}: {source}", path.display())]
    Restore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, MutationError>;
