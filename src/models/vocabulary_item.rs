//! A vocabulary word together with its learner status and SM-2 review state.
//!
//! Items only exist in an initialized form: the spaced-repetition fields are
//! checked whenever an item is rebuilt from persisted data, so scheduling code
//! never has to deal with missing intervals or half-present review dates.
use super::{Quality, WordContent, sm2};
use crate::error::{Result, VocabError};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Learner-assigned study state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Learning,
    Known,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Learning => "learning",
            Status::Known => "known",
        }
    }

    /// Whether a learner may move an item from `self` to `to`.
    /// Nothing goes back to `New`.
    pub fn can_transition_to(self, to: Status) -> bool {
        self == to || to != Status::New
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" => Ok(Status::New),
            "learning" => Ok(Status::Learning),
            "known" => Ok(Status::Known),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Review history of an item. Both dates exist together or not at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewState {
    Unreviewed,
    Reviewed {
        last_reviewed: NaiveDate,
        next_review: NaiveDate,
    },
}

impl ReviewState {
    pub fn last_reviewed(&self) -> Option<NaiveDate> {
        match self {
            ReviewState::Unreviewed => None,
            ReviewState::Reviewed { last_reviewed, .. } => Some(*last_reviewed),
        }
    }

    pub fn next_review(&self) -> Option<NaiveDate> {
        match self {
            ReviewState::Unreviewed => None,
            ReviewState::Reviewed { next_review, .. } => Some(*next_review),
        }
    }
}

/// SM-2 scheduling fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SrsState {
    pub review: ReviewState,
    /// Days between reviews, at least 1.
    pub interval: u32,
    /// Easiness factor, never below [`sm2::MIN_EASINESS`].
    pub easiness: f64,
    /// Consecutive successful recalls.
    pub repetitions: u32,
}

impl Default for SrsState {
    fn default() -> Self {
        Self {
            review: ReviewState::Unreviewed,
            interval: 1,
            easiness: sm2::INITIAL_EASINESS,
            repetitions: 0,
        }
    }
}

impl SrsState {
    /// Rebuilds scheduling state from loosely typed persisted columns.
    pub fn from_parts(
        id: &str,
        last_reviewed: Option<NaiveDate>,
        next_review: Option<NaiveDate>,
        interval: u32,
        easiness: f64,
        repetitions: u32,
    ) -> Result<Self> {
        let malformed = |reason: String| VocabError::MalformedItem {
            id: id.to_string(),
            reason,
        };

        if interval < 1 {
            return Err(malformed(format!("interval {interval} is below 1 day")));
        }
        if !easiness.is_finite() || easiness < sm2::MIN_EASINESS {
            return Err(malformed(format!(
                "easiness {easiness} is below {}",
                sm2::MIN_EASINESS
            )));
        }

        let review = match (last_reviewed, next_review) {
            (None, None) => ReviewState::Unreviewed,
            (Some(last_reviewed), Some(next_review)) => {
                if last_reviewed.checked_add_days(Days::new(interval.into())) != Some(next_review) {
                    return Err(malformed(format!(
                        "next review {next_review} is not {interval} days after {last_reviewed}"
                    )));
                }
                ReviewState::Reviewed {
                    last_reviewed,
                    next_review,
                }
            }
            (Some(_), None) => return Err(malformed("lastReviewed without nextReview".into())),
            (None, Some(_)) => return Err(malformed("nextReview without lastReviewed".into())),
        };

        Ok(Self {
            review,
            interval,
            easiness,
            repetitions,
        })
    }
}

/// A word that has been generated but not yet given scheduling state.
#[derive(Clone, Debug, PartialEq)]
pub struct NewWord {
    pub id: String,
    pub status: Status,
    pub content: WordContent,
}

impl NewWord {
    pub fn new(content: WordContent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            status: Status::New,
            content,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredItem", into = "StoredItem")]
pub struct VocabularyItem {
    pub id: String,
    pub content: WordContent,
    status: Status,
    pub(crate) srs: SrsState,
}

impl VocabularyItem {
    /// Reassembles an item from stored parts, e.g. a database row.
    pub fn restore(id: String, status: Status, content: WordContent, srs: SrsState) -> Self {
        Self {
            id,
            content,
            status,
            srs,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn srs(&self) -> &SrsState {
        &self.srs
    }

    pub fn interval(&self) -> u32 {
        self.srs.interval
    }

    pub fn easiness(&self) -> f64 {
        self.srs.easiness
    }

    pub fn repetitions(&self) -> u32 {
        self.srs.repetitions
    }

    pub fn last_reviewed(&self) -> Option<NaiveDate> {
        self.srs.review.last_reviewed()
    }

    pub fn next_review(&self) -> Option<NaiveDate> {
        self.srs.review.next_review()
    }

    pub fn set_status(&mut self, status: Status) -> Result<()> {
        if !self.status.can_transition_to(status) {
            return Err(VocabError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }

    /// "I know this word": move to `Known` and record a perfect recall.
    pub fn mark_known(&mut self, today: NaiveDate) -> Result<()> {
        self.set_status(Status::Known)?;
        sm2::grade(self, Quality::PERFECT, today);
        Ok(())
    }
}

/// Shape of an item in the persisted JSON collection.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    id: String,
    status: Status,
    #[serde(default, with = "iso_day")]
    last_reviewed: Option<NaiveDate>,
    #[serde(default, with = "iso_day")]
    next_review: Option<NaiveDate>,
    #[serde(default)]
    interval: Option<u32>,
    #[serde(default)]
    easiness: Option<f64>,
    #[serde(default)]
    repetitions: Option<u32>,
    #[serde(flatten)]
    content: WordContent,
}

impl TryFrom<StoredItem> for VocabularyItem {
    type Error = VocabError;

    fn try_from(stored: StoredItem) -> Result<Self> {
        let missing = |field: &'static str| VocabError::UninitializedItem {
            id: stored.id.clone(),
            field,
        };
        let interval = stored.interval.ok_or_else(|| missing("interval"))?;
        let easiness = stored.easiness.ok_or_else(|| missing("easiness"))?;
        let repetitions = stored.repetitions.ok_or_else(|| missing("repetitions"))?;

        let srs = SrsState::from_parts(
            &stored.id,
            stored.last_reviewed,
            stored.next_review,
            interval,
            easiness,
            repetitions,
        )?;
        Ok(VocabularyItem::restore(
            stored.id,
            stored.status,
            stored.content,
            srs,
        ))
    }
}

impl From<VocabularyItem> for StoredItem {
    fn from(item: VocabularyItem) -> Self {
        StoredItem {
            last_reviewed: item.last_reviewed(),
            next_review: item.next_review(),
            interval: Some(item.srs.interval),
            easiness: Some(item.srs.easiness),
            repetitions: Some(item.srs.repetitions),
            id: item.id,
            status: item.status,
            content: item.content,
        }
    }
}

/// Calendar days as `YYYY-MM-DD`. Reading also accepts full ISO 8601
/// timestamps and keeps their local date part.
mod iso_day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => s.serialize_str(&date.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        // Either a bare date or a date followed by `T` and a time of day
        let day = raw.split_once('T').map_or(raw.as_str(), |(day, _)| day);
        NaiveDate::parse_from_str(day, FORMAT)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid date '{raw}': {e}")))
    }
}
