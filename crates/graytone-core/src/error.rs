//! Error types for graytone
//!
//! All fallible operations return `Result<T, Error>`.
//! The normalizer itself never fails; errors come from the filesystem,
//! the config file, or a rule that does not compile.

use std::path::PathBuf;

/// graytone error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Walk error under {}: {message}", root.display())]
    Walk { root: PathBuf, message: String },

    /// Config file missing or malformed
    #[error("Config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A rule pattern failed to compile
    #[error("Rule error in '{name}': {message}")]
    Rule { name: String, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for graytone operations
pub type Result<T> = std::result::Result<T, Error>;
