//! Review session state machine.
//!
//! `Idle -> InProgress -> Completed`. A session walks a due queue once; each
//! grading schedules the current card, records the result and advances the
//! cursor. Reaching the end of the queue completes the session, and an empty
//! queue completes it immediately. A completed session is terminal: a new
//! round needs a freshly built queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::error::{Result, SrsError};
use crate::queue::{DueQueue, QueueEntry};
use crate::types::{Quality, ReviewCard};

/// Lifecycle of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    InProgress,
    Completed,
}

/// Outcome of one graded item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub item_id: i64,
    pub quality: Quality,
    pub was_correct: bool,
}

/// Everything the driver needs after a grading.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub result: ReviewResult,
    /// Card before grading; `None` if this was the first review.
    pub previous: Option<ReviewCard>,
    /// Card to persist: created if `previous` is `None`, updated otherwise.
    pub card: ReviewCard,
    /// True if this grading finished the session.
    pub completed: bool,
}

/// Final (or running) tally of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub state: SessionState,
    pub total: usize,
    pub reviewed: usize,
    pub mastered: usize,
    pub needs_review: usize,
}

/// A single pass over a due queue.
///
/// Owned by whichever layer drives the review loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSession {
    state: SessionState,
    queue: Vec<QueueEntry>,
    position: usize,
    results: Vec<ReviewResult>,
}

impl ReviewSession {
    /// Begin reviewing `queue`. An empty queue yields a completed session.
    pub fn start(queue: DueQueue) -> Self {
        let queue = queue.into_entries();
        let state = if queue.is_empty() {
            SessionState::Completed
        } else {
            SessionState::InProgress
        };
        Self {
            state,
            queue,
            position: 0,
            results: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Entry under the cursor while the session is in progress.
    pub fn current(&self) -> Option<&QueueEntry> {
        match self.state {
            SessionState::InProgress => self.queue.get(self.position),
            _ => None,
        }
    }

    /// Zero-based index of the current entry.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.position)
    }

    pub fn results(&self) -> &[ReviewResult] {
        &self.results
    }

    /// Grade the current entry and advance.
    ///
    /// On error the session is left untouched.
    pub fn grade(
        &mut self,
        algorithm: &dyn SpacedRepetitionAlgorithm,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<GradeOutcome> {
        let entry = self.current().ok_or(SrsError::SessionFinished)?;

        let previous = entry.card.clone();
        let starting = previous
            .clone()
            .unwrap_or_else(|| algorithm.initial_state(entry.item_id));
        let scheduled = algorithm.schedule(&starting, quality, now)?;

        let result = ReviewResult {
            item_id: entry.item_id,
            quality,
            was_correct: quality.is_correct(),
        };

        self.queue[self.position].card = Some(scheduled.card.clone());
        self.results.push(result.clone());
        self.position += 1;
        if self.position >= self.queue.len() {
            self.state = SessionState::Completed;
        }

        Ok(GradeOutcome {
            result,
            previous,
            card: scheduled.card,
            completed: self.is_completed(),
        })
    }

    pub fn summary(&self) -> SessionSummary {
        let mastered = self.results.iter().filter(|r| r.was_correct).count();
        SessionSummary {
            state: self.state,
            total: self.queue.len(),
            reviewed: self.results.len(),
            mastered,
            needs_review: self.results.len() - mastered,
        }
    }
}
