//! Spaced repetition engine for vocabulary review.
//!
//! Provides:
//! - SM-2 scheduling (`calculate_srs`) over explicit `ReviewCard` state
//! - Due-queue selection for a learner's cards
//! - Review session state machine (Idle -> InProgress -> Completed)
//! - Multiple-choice quiz adapter mapping answers onto the 0-5 quality scale
//! - Progress summaries over a learner's cards

pub mod algorithm;
pub mod error;
pub mod progress;
pub mod queue;
pub mod quiz;
pub mod session;
pub mod types;

pub use algorithm::{calculate_srs, sm2::Sm2, SchedulingResult, SpacedRepetitionAlgorithm};
pub use error::{Result, SrsError};
pub use progress::ProgressSummary;
pub use queue::{build_due_queue, is_due, partition_due, DueQueue, QueueEntry};
pub use quiz::{build_question, DistractorPool, QuizGrading, QuizOption, QuizQuestion};
pub use session::{GradeOutcome, ReviewResult, ReviewSession, SessionState, SessionSummary};
pub use types::{LearningItem, Quality, ReviewCard, ReviewSettings};
