//! Core types for the review engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SrsError};

/// Ease factor assigned to a card that has never been graded.
pub const DEFAULT_EASE: f64 = 2.5;

/// Lowest ease factor a card may hold.
pub const MINIMUM_EASE: f64 = 1.3;

/// Scheduling state for one (learner, item) pair.
///
/// A card does not exist until the item is graded for the first time. Callers
/// that need a starting point for an ungraded item use [`ReviewCard::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCard {
    pub item_id: i64,
    pub repetitions: u32,
    pub interval_days: u32,
    pub ease_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

impl ReviewCard {
    /// Default state for an item that has never been reviewed.
    pub fn new(item_id: i64) -> Self {
        Self {
            item_id,
            repetitions: 0,
            interval_days: 0,
            ease_factor: DEFAULT_EASE,
            last_review: None,
            next_review: None,
        }
    }

    /// Reject numerics that cannot be scheduled from.
    pub fn validate(&self) -> Result<()> {
        if !self.ease_factor.is_finite() {
            return Err(SrsError::invalid(format!(
                "ease factor for item {} is not finite",
                self.item_id
            )));
        }
        if self.ease_factor < MINIMUM_EASE {
            return Err(SrsError::invalid(format!(
                "ease factor for item {} is below the floor of {}: {}",
                self.item_id, MINIMUM_EASE, self.ease_factor
            )));
        }
        Ok(())
    }

    /// True once the card has been graded at least once.
    pub fn is_reviewed(&self) -> bool {
        self.last_review.is_some()
    }
}

/// Recall quality on the 0-5 scale.
///
/// 0-2 is a failed recall, 3 correct with difficulty, 4 correct, 5 perfect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(pub(crate) u8);

impl Quality {
    pub const MAX: u8 = 5;
    pub const PASSING: u8 = 3;
    pub const PERFECT: Quality = Quality(5);

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(SrsError::invalid(format!(
                "quality must be between 0 and {}, got {value}",
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Build from a wider integer, as received over the wire.
    pub fn from_i32(value: i32) -> Result<Self> {
        u8::try_from(value)
            .map_err(|_| SrsError::invalid(format!("quality must be between 0 and 5, got {value}")))
            .and_then(Self::new)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// A recall counts as successful at 3 or above.
    pub fn is_correct(self) -> bool {
        self.0 >= Self::PASSING
    }
}

impl TryFrom<u8> for Quality {
    type Error = SrsError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Catalog entry for something a learner can review, e.g. a vocabulary word.
///
/// The catalog is owned elsewhere; scheduling only ever looks at `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningItem {
    pub id: i64,
    pub text: String,
    pub meaning: String,
}

/// Per-learner review tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSettings {
    /// Maximum number of due items pulled into one queue.
    pub reviews_per_day: u32,
    /// Wrong options shown next to the right one in quiz mode.
    pub distractor_count: u32,
    /// Whether a failed recall also lowers the ease factor.
    pub update_ease_on_failure: bool,
    /// Quality recorded for a wrong quiz answer (1 or 2).
    pub quiz_incorrect_quality: u8,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            reviews_per_day: 200,
            distractor_count: 3,
            update_ease_on_failure: true,
            quiz_incorrect_quality: 1,
        }
    }
}

impl ReviewSettings {
    pub fn validate(&self) -> Result<()> {
        if self.reviews_per_day == 0 {
            return Err(SrsError::invalid("reviews_per_day must be at least 1"));
        }
        if !(1..=10).contains(&self.distractor_count) {
            return Err(SrsError::invalid(format!(
                "distractor_count must be between 1 and 10, got {}",
                self.distractor_count
            )));
        }
        if !(1..=2).contains(&self.quiz_incorrect_quality) {
            return Err(SrsError::invalid(format!(
                "quiz_incorrect_quality must be 1 or 2, got {}",
                self.quiz_incorrect_quality
            )));
        }
        Ok(())
    }
}
