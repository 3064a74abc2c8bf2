//! Policies that turn a practice outcome into an SM-2 quality grade.
//!
//! Games and review screens measure performance differently, so each one
//! picks its own policy instead of the scheduler hard-coding thresholds.
use super::Quality;
use serde::{Deserialize, Serialize};

pub trait QualityPolicy<O> {
    fn assess(&self, outcome: &O) -> Quality;
}

/// The learner's own verdict on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelfRating {
    Knew,
    Unsure,
    Forgot,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SelfAssessment;

impl QualityPolicy<SelfRating> for SelfAssessment {
    fn assess(&self, outcome: &SelfRating) -> Quality {
        match outcome {
            SelfRating::Knew => Quality::PERFECT,
            SelfRating::Unsure => Quality::PASS,
            SelfRating::Forgot => Quality::BLACKOUT,
        }
    }
}

/// Result of one round of the pair-matching game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchingOutcome {
    pub pairs: usize,
    pub moves: usize,
}

/// Grades a matching round by how many moves it took per pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MoveCountSettings", into = "MoveCountSettings")]
pub struct MoveCountPolicy {
    strong_ratio: f64,
    strong_quality: Quality,
    weak_quality: Quality,
}

impl MoveCountPolicy {
    pub fn new(strong_ratio: f64, strong_quality: Quality, weak_quality: Quality) -> Self {
        Self {
            strong_ratio,
            strong_quality,
            weak_quality,
        }
    }
}

impl Default for MoveCountPolicy {
    fn default() -> Self {
        Self::new(2.0, Quality::PERFECT, Quality::PASS)
    }
}

impl QualityPolicy<MatchingOutcome> for MoveCountPolicy {
    fn assess(&self, outcome: &MatchingOutcome) -> Quality {
        let budget = outcome.pairs as f64 * self.strong_ratio;
        if (outcome.moves as f64) < budget {
            self.strong_quality
        } else {
            self.weak_quality
        }
    }
}

/// Config-file shape of [`MoveCountPolicy`].
#[derive(Serialize, Deserialize)]
struct MoveCountSettings {
    strong_ratio: f64,
    strong_quality: u8,
    weak_quality: u8,
}

impl TryFrom<MoveCountSettings> for MoveCountPolicy {
    type Error = crate::error::VocabError;

    fn try_from(settings: MoveCountSettings) -> Result<Self, Self::Error> {
        Ok(MoveCountPolicy::new(
            settings.strong_ratio,
            Quality::new(settings.strong_quality)?,
            Quality::new(settings.weak_quality)?,
        ))
    }
}

impl From<MoveCountPolicy> for MoveCountSettings {
    fn from(policy: MoveCountPolicy) -> Self {
        MoveCountSettings {
            strong_ratio: policy.strong_ratio,
            strong_quality: policy.strong_quality.value(),
            weak_quality: policy.weak_quality.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_assessment() {
        let policy = SelfAssessment;
        assert_eq!(policy.assess(&SelfRating::Knew), Quality::PERFECT);
        assert_eq!(policy.assess(&SelfRating::Unsure), Quality::PASS);
        assert!(!policy.assess(&SelfRating::Forgot).is_pass());
    }

    #[test]
    fn test_move_count_thresholds() {
        let policy = MoveCountPolicy::default();

        let quick = MatchingOutcome { pairs: 5, moves: 9 };
        let at_budget = MatchingOutcome { pairs: 5, moves: 10 };
        let slow = MatchingOutcome { pairs: 5, moves: 25 };

        assert_eq!(policy.assess(&quick), Quality::PERFECT);
        assert_eq!(policy.assess(&at_budget), Quality::PASS);
        assert_eq!(policy.assess(&slow), Quality::PASS);
    }

    #[test]
    fn test_custom_policy() {
        let policy = MoveCountPolicy::new(1.5, Quality::new(4).unwrap(), Quality::new(2).unwrap());
        assert_eq!(policy.assess(&MatchingOutcome { pairs: 4, moves: 5 }).value(), 4);
        assert_eq!(policy.assess(&MatchingOutcome { pairs: 4, moves: 6 }).value(), 2);
    }
}
