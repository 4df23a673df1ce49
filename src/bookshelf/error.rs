use crate::form::FormField;
use crate::model::BookId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    /// A positional index outside `[0, len)`. Reaching this from the UI means
    /// the rendered rows and the model went out of sync.
    #[error("Index {index} is out of range for a library of {len} books")]
    OutOfRange { index: usize, len: usize },

    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// Holds the zero-based row; displayed 1-based, as the table numbers rows.
    #[error("No row {} in the current table", .0 + 1)]
    NoSuchRow(usize),

    #[error("{0}")]
    InvalidIndex(String),

    #[error("Invalid {field} \"{value}\": {reason}")]
    UnparseableInput {
        field: FormField,
        value: String,
        reason: &'static str,
    },

    #[error("Storage quota exceeded while writing \"{key}\"")]
    QuotaExceeded { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
