pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use config::Config;
pub use database::db::{StatusCounts, VocabularyStore};
pub use error::{Result, VocabError};
pub use models::sm2::{calculate_next_review, grade, initialize, select_due};
pub use models::{IntakeSession, NewWord, Quality, Status, VocabularyItem, WordContent};
