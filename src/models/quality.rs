//! Recall quality on the SM-2 0-5 scale.
use crate::error::{Result, VocabError};
use std::fmt;

/// A validated recall grade. 0 = complete blackout, 5 = perfect response.
/// Grades of 3 and above count as a successful recall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    pub const BLACKOUT: Quality = Quality(0);
    pub const PASS: Quality = Quality(3);
    pub const PERFECT: Quality = Quality(5);

    pub fn new(value: u8) -> Result<Self> {
        if value > 5 {
            return Err(VocabError::InvalidQuality(value.to_string()));
        }
        Ok(Quality(value))
    }

    /// Accepts a loosely typed score, e.g. one computed by a game heuristic.
    /// Rejects NaN, infinities, fractions and anything outside 0..=5.
    pub fn from_score(score: f64) -> Result<Self> {
        if !score.is_finite() || score.fract() != 0.0 || !(0.0..=5.0).contains(&score) {
            return Err(VocabError::InvalidQuality(score.to_string()));
        }
        Ok(Quality(score as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self >= Quality::PASS
    }
}

impl TryFrom<u8> for Quality {
    type Error = VocabError;

    fn try_from(value: u8) -> Result<Self> {
        Quality::new(value)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
