//! Learner progress over a set of review cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::queue::is_due;
use crate::types::{ReviewCard, DEFAULT_EASE};

/// Interval (days) from which a card counts as mastered.
pub const MASTERED_INTERVAL_DAYS: u32 = 21;

/// Counts describing where a learner stands across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_items: usize,
    pub reviewed: usize,
    pub unseen: usize,
    pub due_now: usize,
    /// Reviewed cards below the mastery interval
    pub learning: usize,
    pub mastered: usize,
    pub average_ease: f64,
}

impl ProgressSummary {
    /// Summarize `cards` against a catalog of `catalog_size` items.
    ///
    /// Items without a card count as unseen and due.
    pub fn from_cards(cards: &[ReviewCard], catalog_size: usize, now: DateTime<Utc>) -> Self {
        let reviewed = cards.len();
        let unseen = catalog_size.saturating_sub(reviewed);
        let due_reviewed = cards.iter().filter(|c| is_due(Some(*c), now)).count();
        let mastered = cards
            .iter()
            .filter(|c| c.interval_days >= MASTERED_INTERVAL_DAYS)
            .count();

        let average_ease = if cards.is_empty() {
            DEFAULT_EASE
        } else {
            cards.iter().map(|c| c.ease_factor).sum::<f64>() / reviewed as f64
        };

        Self {
            total_items: catalog_size.max(reviewed),
            reviewed,
            unseen,
            due_now: unseen + due_reviewed,
            learning: reviewed - mastered,
            mastered,
            average_ease,
        }
    }
}
