//! Error types for forge

use thiserror::Error;

/// Result type alias for forge operations
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Unified error type for all forge operations
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("style compile error in {file}: {message}")]
    StyleCompile { file: String, message: String },

    #[error("css transform error: {0}")]
    CssTransform(String),

    #[error("script transform error: {0}")]
    ScriptTransform(String),

    #[error("image processing error: {0}")]
    Image(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid glob pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("server error: {0}")]
    Server(String),

    #[error("watch error: {0}")]
    Watch(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForgeError {
    /// Returns true for the per-file style errors the pipeline tolerates:
    /// the offending file is skipped and the task keeps going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ForgeError::StyleCompile { .. })
    }
}

impl From<toml::de::Error> for ForgeError {
    fn from(err: toml::de::Error) -> Self {
        ForgeError::Config(err.to_string())
    }
}
