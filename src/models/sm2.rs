//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates review intervals based on recall quality:
//! - Each word has an easiness factor (EF) that adjusts based on performance
//! - Quality grades 0-2: Reset interval to 1 day and repetitions to 0, EF untouched
//! - Quality grades 3-5: Increase interval progressively (1 day → 6 days → EF multiplier)
//! - EF is adjusted after each successful review and has a minimum value of 1.3
//! - Dates are whole calendar days; time of day never matters
//!
//! Due selection puts every `learning` word first, then `known` words whose
//! next review date has already passed, most overdue first.

use super::{NewWord, Quality, ReviewState, SrsState, Status, VocabularyItem};
use chrono::{Days, Local, NaiveDate};
use std::collections::HashSet;
use tracing::debug;

pub const INITIAL_EASINESS: f64 = 2.5;
pub const MIN_EASINESS: f64 = 1.3;
/// Size of a practice pool when the caller has no game-specific need.
pub const DEFAULT_DUE_LIMIT: usize = 20;
/// Upper bound on the review interval (100 years).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// The learner's current calendar day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Gives a freshly generated word its default scheduling state.
pub fn initialize(word: NewWord) -> VocabularyItem {
    VocabularyItem::restore(word.id, word.status, word.content, SrsState::default())
}

/// Calculates new review state according to the SM-2 algorithm.
pub fn calculate_next_review(srs: &SrsState, quality: Quality, today: NaiveDate) -> SrsState {
    let (interval, easiness, repetitions) = if !quality.is_pass() {
        // Failed recall: start over, keep EF
        (1, srs.easiness, 0)
    } else {
        let q = f64::from(quality.value());
        let easiness =
            (srs.easiness + 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)).max(MIN_EASINESS);

        let repetitions = srs.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            _ => {
                let grown = (f64::from(srs.interval) * easiness).ceil();
                grown.min(f64::from(MAX_INTERVAL_DAYS)) as u32
            }
        };
        (interval, easiness, repetitions)
    };

    // Only saturates for dates at the very end of chrono's range.
    let next_review = today
        .checked_add_days(Days::new(interval.into()))
        .unwrap_or(NaiveDate::MAX);

    SrsState {
        review: ReviewState::Reviewed {
            last_reviewed: today,
            next_review,
        },
        interval,
        easiness,
        repetitions,
    }
}

/// Records a graded review of `item` on `today`.
pub fn grade(item: &mut VocabularyItem, quality: Quality, today: NaiveDate) {
    item.srs = calculate_next_review(&item.srs, quality, today);
    debug!(
        id = %item.id,
        %quality,
        interval = item.srs.interval,
        easiness = item.srs.easiness,
        repetitions = item.srs.repetitions,
        "graded review"
    );
}

/// Picks up to `limit` items to practice on `today`.
///
/// Learning items come first in collection order, followed by known items
/// whose next review is strictly before `today`, oldest first.
pub fn select_due(items: &[VocabularyItem], limit: usize, today: NaiveDate) -> Vec<&VocabularyItem> {
    let learning = items.iter().filter(|item| item.status() == Status::Learning);

    let mut overdue: Vec<(NaiveDate, &VocabularyItem)> = items
        .iter()
        .filter(|item| item.status() == Status::Known)
        .filter_map(|item| item.next_review().map(|next| (next, item)))
        .filter(|(next, _)| *next < today)
        .collect();
    overdue.sort_by_key(|(next, _)| *next);

    let mut seen = HashSet::new();
    learning
        .chain(overdue.into_iter().map(|(_, item)| item))
        .filter(|&item| seen.insert(item.id.as_str()))
        .take(limit)
        .collect()
}
