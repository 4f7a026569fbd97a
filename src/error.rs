use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum CodebaseError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Vcs(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
impl CodebaseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodebaseError::Io {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn pattern(pattern: &str, message: impl ToString) -> Self {
        CodebaseError::Pattern {
            pattern: pattern.to_string(),
            message: message.to_string(),
        }
    }
}
pub type Result<T> = std::result::Result<T, CodebaseError>;
