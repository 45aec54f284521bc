//! SM-2 spaced repetition algorithm.
//!
//! Quality 0-2 resets the streak and brings the card back the next day.
//! Quality 3-5 walks the interval ladder: 1 day, 6 days, then the previous
//! interval times the ease factor the card carried into this grading. The
//! ease factor moves on every grading and never drops below 1.3.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::error::Result;
use crate::types::{Quality, ReviewCard, ReviewSettings, DEFAULT_EASE, MINIMUM_EASE};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    pub failure_interval: u32,
    pub maximum_interval: u32,
    /// Apply the ease adjustment on failed recalls too (classic SM-2).
    pub update_ease_on_failure: bool,
    /// Grow intervals with the ease computed in this grading instead of the
    /// ease the card held before it.
    pub grow_with_updated_ease: bool,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_EASE,
            minimum_ease: MINIMUM_EASE,
            first_interval: 1,
            second_interval: 6,
            failure_interval: 1,
            maximum_interval: 36500,
            update_ease_on_failure: true,
            grow_with_updated_ease: false,
        }
    }
}

impl Sm2 {
    /// SM-2 tuned by a learner's settings.
    pub fn from_settings(settings: &ReviewSettings) -> Self {
        Self {
            update_ease_on_failure: settings.update_ease_on_failure,
            ..Self::default()
        }
    }

    /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored.
    fn next_ease(&self, ease: f64, quality: Quality) -> f64 {
        let miss = (Quality::MAX - quality.value()) as f64;
        let delta = 0.1 - miss * (0.08 + miss * 0.02);
        (ease + delta).max(self.minimum_ease)
    }

    fn next_interval(&self, repetitions: u32, previous: u32, ease: f64) -> u32 {
        let interval = match repetitions {
            1 => self.first_interval,
            2 => self.second_interval,
            _ => (previous.max(1) as f64 * ease).round() as u32,
        };
        interval.min(self.maximum_interval)
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, item_id: i64) -> ReviewCard {
        ReviewCard {
            ease_factor: self.initial_ease,
            ..ReviewCard::new(item_id)
        }
    }

    fn schedule(
        &self,
        card: &ReviewCard,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult> {
        card.validate()?;

        let adjusted_ease = self.next_ease(card.ease_factor, quality);

        let (repetitions, interval_days, ease_factor) = if quality.is_correct() {
            let repetitions = card.repetitions.saturating_add(1);
            let growth = if self.grow_with_updated_ease {
                adjusted_ease
            } else {
                card.ease_factor.max(self.minimum_ease)
            };
            let interval = self.next_interval(repetitions, card.interval_days, growth);
            (repetitions, interval, adjusted_ease)
        } else {
            let ease = if self.update_ease_on_failure {
                adjusted_ease
            } else {
                card.ease_factor.max(self.minimum_ease)
            };
            (0, self.failure_interval, ease)
        };

        let next_review = now + Duration::days(interval_days as i64);

        Ok(SchedulingResult {
            card: ReviewCard {
                item_id: card.item_id,
                repetitions,
                interval_days,
                ease_factor,
                last_review: Some(now),
                next_review: Some(next_review),
            },
            next_review,
        })
    }
}
