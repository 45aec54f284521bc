//! Due-queue selection.
//!
//! An item is due when it has no card yet, when its card has never been
//! scheduled, or when its scheduled review time has passed. Selection is
//! read-only and keeps the caller's order; any presentation sort is applied
//! on top by the consumer.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LearningItem, ReviewCard};

/// True when an item with this card should be reviewed at `now`.
pub fn is_due(card: Option<&ReviewCard>, now: DateTime<Utc>) -> bool {
    match card.and_then(|c| c.next_review) {
        None => true,
        Some(next_review) => next_review <= now,
    }
}

/// One item waiting for review, with its card when it has been graded before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub item_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<ReviewCard>,
}

impl QueueEntry {
    /// Card to schedule from; the default state if the item is unseen.
    pub fn card_or_default(&self) -> ReviewCard {
        self.card
            .clone()
            .unwrap_or_else(|| ReviewCard::new(self.item_id))
    }
}

/// Ordered, session-scoped list of due items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DueQueue {
    entries: Vec<QueueEntry>,
}

impl DueQueue {
    /// Join the external catalog with a learner's cards.
    ///
    /// Items come out in catalog order. Cards whose item is missing from the
    /// catalog are dropped silently.
    pub fn from_catalog(
        items: &[LearningItem],
        cards: &HashMap<i64, ReviewCard>,
        now: DateTime<Utc>,
    ) -> Self {
        build_due_queue(
            items
                .iter()
                .map(|item| (item.id, cards.get(&item.id).cloned())),
            now,
        )
    }

    /// Keep at most `limit` entries.
    pub fn truncate(&mut self, limit: usize) {
        self.entries.truncate(limit);
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<QueueEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.item_id).collect()
    }
}

impl From<Vec<QueueEntry>> for DueQueue {
    fn from(entries: Vec<QueueEntry>) -> Self {
        Self { entries }
    }
}

/// Collect the due subset of `(item_id, card)` pairs, preserving input order.
pub fn build_due_queue<I>(pairs: I, now: DateTime<Utc>) -> DueQueue
where
    I: IntoIterator<Item = (i64, Option<ReviewCard>)>,
{
    let (due, _) = partition_due(pairs, now);
    DueQueue::from(due)
}

/// Split `(item_id, card)` pairs into `(due, not_due)`.
pub fn partition_due<I>(pairs: I, now: DateTime<Utc>) -> (Vec<QueueEntry>, Vec<QueueEntry>)
where
    I: IntoIterator<Item = (i64, Option<ReviewCard>)>,
{
    pairs
        .into_iter()
        .map(|(item_id, card)| QueueEntry { item_id, card })
        .partition(|entry| is_due(entry.card.as_ref(), now))
}
