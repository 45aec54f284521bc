//! Spaced repetition scheduling.

pub mod sm2;

use crate::error::Result;
use crate::types::{Quality, ReviewCard};
use chrono::{DateTime, Utc};

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub card: ReviewCard,
    pub next_review: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next scheduling state after a graded recall.
    ///
    /// Pure: the returned card is what the caller persists. On error nothing
    /// should be persisted.
    fn schedule(&self, card: &ReviewCard, quality: Quality, now: DateTime<Utc>)
        -> Result<SchedulingResult>;

    /// Starting state for an item that has never been graded.
    fn initial_state(&self, item_id: i64) -> ReviewCard;
}

/// Schedule `card` with the default SM-2 parameters.
pub fn calculate_srs(
    card: &ReviewCard,
    quality: Quality,
    now: DateTime<Utc>,
) -> Result<SchedulingResult> {
    sm2::Sm2::default().schedule(card, quality, now)
}
