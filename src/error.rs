use crate::document::Kind;

/// Failures surfaced by the loud tier: wrong-kind access, missing keys,
/// out-of-range writes, strict-mode parsing, and file output. Recoverable
/// data-quality problems never show up here; they go to the diagnostic sink
/// while the engine carries on with a best-effort result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("parse error at offset {offset}: {message}")]
    Parse { message: String, offset: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn type_mismatch(expected: Kind, found: Kind) -> Self {
        Error::TypeMismatch { expected, found }
    }

    pub fn key_not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound { key: key.into() }
    }

    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Error::IndexOutOfBounds { index, len }
    }

    pub fn parse(message: impl Into<String>, offset: usize) -> Self {
        Error::Parse {
            message: message.into(),
            offset,
        }
    }
}
