//! Intake of freshly generated words.
//! The learner goes through the batch one word at a time and sorts each word
//! into "learning" or "known"; every decision is merged into the collection.

use super::sm2::initialize;
use super::{NewWord, Status, VocabularyItem, WordContent};
use crate::database::db::VocabularyStore;
use crate::error::{Result, VocabError};
use tracing::{debug, info};

/// Manages one pass over a batch of new words.
pub struct IntakeSession {
    pub words: Vec<VocabularyItem>,
    pub current_index: usize,
}

impl IntakeSession {
    /// Creates a session from generated content, giving each word default review state.
    ///
    /// Words already in the collection are dropped so their review history is
    /// never overwritten by a fresh copy.
    pub fn new(store: &VocabularyStore, contents: Vec<WordContent>) -> Result<Self> {
        let mut words = Vec::with_capacity(contents.len());
        for content in contents {
            if store.find_by_word(&content.word)?.is_some() {
                debug!(word = %content.word, "already in collection, skipping");
                continue;
            }
            words.push(initialize(NewWord::new(content)));
        }
        Ok(Self::from_items(words))
    }

    pub fn from_items(words: Vec<VocabularyItem>) -> Self {
        Self {
            words,
            current_index: 0,
        }
    }

    pub fn current_word(&self) -> Option<&VocabularyItem> {
        self.words.get(self.current_index)
    }

    /// Applies the learner's decision to the current word, stores it and moves on.
    ///
    /// Choosing `Known` also records a perfect first review.
    /// Returns the stored item, or `None` once the batch is exhausted.
    pub fn decide(
        &mut self,
        store: &VocabularyStore,
        status: Status,
    ) -> Result<Option<VocabularyItem>> {
        let Some(word) = self.words.get_mut(self.current_index) else {
            return Ok(None);
        };

        match status {
            Status::New => {
                return Err(VocabError::InvalidTransition {
                    from: word.status(),
                    to: Status::New,
                });
            }
            Status::Known => word.mark_known(store.current_date()?)?,
            Status::Learning => word.set_status(Status::Learning)?,
        }
        store.upsert(word)?;
        let decided = word.clone();

        self.current_index += 1;
        if self.is_completed() {
            info!(words = self.total_count(), "intake finished");
        }
        Ok(Some(decided))
    }

    pub fn decided_count(&self) -> usize {
        self.current_index.min(self.words.len())
    }

    pub fn total_count(&self) -> usize {
        self.words.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.decided_count()
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.words.len()
    }

    pub fn progress_message(&self) -> String {
        if self.is_completed() {
            format!("All {} words sorted", self.total_count())
        } else {
            format!("Word {} of {}", self.current_index + 1, self.total_count())
        }
    }
}
