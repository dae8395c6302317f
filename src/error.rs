//! Errors raised while loading configuration and pattern files.
//!
//! The engine itself has no failure modes; these only come from the
//! collaborators that feed it.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("decode error on line {line}: {message}")]
    Decode { line: usize, message: String },
}
