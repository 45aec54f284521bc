//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from srs-core
pub use srs_core::{
    GradeOutcome, LearningItem, ProgressSummary, QuizQuestion, ReviewCard, ReviewResult,
    ReviewSettings, SessionState, SessionSummary,
};

// === Database Entity Types ===

/// Registered learner
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Learner {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Catalog entry stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLearningItem {
    pub id: i64,
    pub text: String,
    pub meaning: String,
}

impl DbLearningItem {
    pub fn to_core_item(&self) -> LearningItem {
        LearningItem {
            id: self.id,
            text: self.text.clone(),
            meaning: self.meaning.clone(),
        }
    }
}

/// Review card in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewCard {
    pub learner_id: Uuid,
    pub item_id: i64,
    pub repetitions: i32,
    pub interval_days: i32,
    pub ease_factor: f64,
    pub last_review: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbReviewCard {
    /// Create from srs-core ReviewCard
    pub fn from_core_card(learner_id: Uuid, card: &ReviewCard) -> Self {
        Self {
            learner_id,
            item_id: card.item_id,
            repetitions: i32::try_from(card.repetitions).unwrap_or(i32::MAX),
            interval_days: i32::try_from(card.interval_days).unwrap_or(i32::MAX),
            ease_factor: card.ease_factor,
            last_review: card.last_review,
            next_review: card.next_review,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Convert to srs-core ReviewCard
    pub fn to_core_card(&self) -> ReviewCard {
        ReviewCard {
            item_id: self.item_id,
            repetitions: u32::try_from(self.repetitions).unwrap_or(0),
            interval_days: u32::try_from(self.interval_days).unwrap_or(0),
            ease_factor: self.ease_factor,
            last_review: self.last_review,
            next_review: self.next_review,
        }
    }
}

/// How an item was presented when it was graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    /// Learner self-rates recall on the 0-5 scale
    #[default]
    Recall,
    /// Multiple choice, mapped to quality by QuizGrading
    Quiz,
}

impl ReviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recall => "recall",
            Self::Quiz => "quiz",
        }
    }
}

/// Review log record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReview {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub item_id: i64,
    pub session_id: Option<Uuid>,
    pub mode: String,
    pub quality: i16,
    pub was_correct: bool,
    pub interval_before: Option<i32>,
    pub interval_after: i32,
    pub ease_before: Option<f64>,
    pub ease_after: f64,
    pub reviewed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl DbReview {
    /// Build the log entry for a grading
    pub fn from_outcome(
        learner_id: Uuid,
        session_id: Option<Uuid>,
        mode: ReviewMode,
        outcome: &GradeOutcome,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            learner_id,
            item_id: outcome.result.item_id,
            session_id,
            mode: mode.as_str().to_string(),
            quality: outcome.result.quality.value() as i16,
            was_correct: outcome.result.was_correct,
            interval_before: outcome
                .previous
                .as_ref()
                .map(|c| i32::try_from(c.interval_days).unwrap_or(i32::MAX)),
            interval_after: i32::try_from(outcome.card.interval_days).unwrap_or(i32::MAX),
            ease_before: outcome.previous.as_ref().map(|c| c.ease_factor),
            ease_after: outcome.card.ease_factor,
            reviewed_at,
            created_at: Utc::now(),
        }
    }
}

/// Learner settings in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLearnerSettings {
    pub learner_id: Uuid,
    pub reviews_per_day: i32,
    pub distractor_count: i32,
    pub update_ease_on_failure: bool,
    pub quiz_incorrect_quality: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbLearnerSettings {
    /// Create default settings for a learner
    pub fn default_for_learner(learner_id: Uuid) -> Self {
        Self::from_core_settings(learner_id, &ReviewSettings::default())
    }

    pub fn from_core_settings(learner_id: Uuid, settings: &ReviewSettings) -> Self {
        Self {
            learner_id,
            reviews_per_day: i32::try_from(settings.reviews_per_day).unwrap_or(i32::MAX),
            distractor_count: i32::try_from(settings.distractor_count).unwrap_or(i32::MAX),
            update_ease_on_failure: settings.update_ease_on_failure,
            quiz_incorrect_quality: settings.quiz_incorrect_quality as i16,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Convert to srs-core ReviewSettings
    pub fn to_core_settings(&self) -> ReviewSettings {
        let defaults = ReviewSettings::default();
        ReviewSettings {
            reviews_per_day: u32::try_from(self.reviews_per_day)
                .unwrap_or(defaults.reviews_per_day),
            distractor_count: u32::try_from(self.distractor_count)
                .unwrap_or(defaults.distractor_count),
            update_ease_on_failure: self.update_ease_on_failure,
            quiz_incorrect_quality: u8::try_from(self.quiz_incorrect_quality)
                .unwrap_or(defaults.quiz_incorrect_quality),
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterLearnerRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterLearnerResponse {
    pub learner_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LearnerStatusResponse {
    pub learner_id: Uuid,
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

// Review types
#[derive(Debug, Serialize, Deserialize)]
pub struct QueuedItem {
    pub item: LearningItem,
    pub card: Option<ReviewCard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewQueueResponse {
    pub items: Vec<QueuedItem>,
    /// Due items before the daily cap was applied
    pub total_due: usize,
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeItemRequest {
    pub item_id: i64,
    pub quality: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeItemResponse {
    pub card: ReviewCard,
    pub was_correct: bool,
    pub next_review: DateTime<Utc>,
}

// Session types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub mode: ReviewMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub mode: ReviewMode,
    pub state: SessionState,
    pub position: usize,
    pub total: usize,
    pub remaining: usize,
    pub current: Option<LearningItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuizQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionGradeRequest {
    pub quality: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizAnswerRequest {
    pub option_index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionGradeResponse {
    pub result: ReviewResult,
    pub card: ReviewCard,
    /// Right option for the question just answered (quiz mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
    /// Set when the grade was applied but could not be saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
    pub session: SessionView,
}

// Settings types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub reviews_per_day: Option<u32>,
    pub distractor_count: Option<u32>,
    pub update_ease_on_failure: Option<bool>,
    pub quiz_incorrect_quality: Option<u8>,
}

impl UpdateSettingsRequest {
    /// Overlay the requested fields on `current`
    pub fn apply(&self, current: &ReviewSettings) -> ReviewSettings {
        ReviewSettings {
            reviews_per_day: self.reviews_per_day.unwrap_or(current.reviews_per_day),
            distractor_count: self.distractor_count.unwrap_or(current.distractor_count),
            update_ease_on_failure: self
                .update_ease_on_failure
                .unwrap_or(current.update_ease_on_failure),
            quiz_incorrect_quality: self
                .quiz_incorrect_quality
                .unwrap_or(current.quiz_incorrect_quality),
        }
    }
}

// Progress types
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub summary: ProgressSummary,
    pub reviews_today: i64,
}
