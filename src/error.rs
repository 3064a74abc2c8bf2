//! Error type shared by the scheduler, the store and the JSON import/export.

use crate::models::Status;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VocabError>;

#[derive(Debug, Error)]
pub enum VocabError {
    /// Quality score outside 0..=5, fractional, or not a finite number.
    #[error("invalid quality {0}: expected an integer between 0 and 5")]
    InvalidQuality(String),

    /// An item arrived without its spaced-repetition fields.
    #[error("item {id} was never initialized: missing {field}")]
    UninitializedItem { id: String, field: &'static str },

    /// SRS fields are present but outside their domain.
    #[error("item {id} is malformed: {reason}")]
    MalformedItem { id: String, reason: String },

    #[error("no vocabulary item with id {0}")]
    UnknownItem(String),

    #[error("cannot change status from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for VocabError {
    fn from(err: figment::Error) -> Self {
        VocabError::Config(Box::new(err))
    }
}
