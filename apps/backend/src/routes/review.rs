//! Due queue and direct grading endpoints

use std::collections::HashMap;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use srs_core::{
    DueQueue, GradeOutcome, LearningItem, Quality, ReviewResult, ReviewSettings, Sm2,
    SpacedRepetitionAlgorithm,
};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// Catalog, capped due queue, and the due count before the cap.
pub(crate) struct LoadedQueue {
    pub catalog: Vec<LearningItem>,
    pub queue: DueQueue,
    pub total_due: usize,
}

/// Build the learner's due queue at `now` from the catalog and stored cards
pub(crate) async fn load_queue(
    db: &Database,
    learner_id: Uuid,
    settings: &ReviewSettings,
    now: DateTime<Utc>,
) -> Result<LoadedQueue> {
    let catalog: Vec<LearningItem> = db
        .list_items()
        .await?
        .iter()
        .map(DbLearningItem::to_core_item)
        .collect();

    let cards: HashMap<i64, ReviewCard> = db
        .list_review_cards(learner_id)
        .await?
        .iter()
        .map(|c| (c.item_id, c.to_core_card()))
        .collect();

    let mut queue = DueQueue::from_catalog(&catalog, &cards, now);
    let total_due = queue.len();
    queue.truncate(settings.reviews_per_day as usize);

    tracing::debug!(
        "Built due queue for learner {}: {} of {} due items",
        learner_id,
        queue.len(),
        total_due
    );

    Ok(LoadedQueue {
        catalog,
        queue,
        total_due,
    })
}

/// Save the graded card and append the review log entry
pub(crate) async fn persist_outcome(
    db: &Database,
    learner_id: Uuid,
    session_id: Option<Uuid>,
    mode: ReviewMode,
    outcome: &GradeOutcome,
    now: DateTime<Utc>,
) -> Result<()> {
    let card = DbReviewCard::from_core_card(learner_id, &outcome.card);
    db.upsert_review_card(&card).await?;

    let review = DbReview::from_outcome(learner_id, session_id, mode, outcome, now);
    db.insert_review(&review).await?;

    Ok(())
}

/// GET /api/review/queue
pub async fn queue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<ReviewQueueResponse>> {
    let settings = state.db.get_settings(auth.learner_id).await?.to_core_settings();
    let loaded = load_queue(&state.db, auth.learner_id, &settings, Utc::now()).await?;

    let by_id: HashMap<i64, &LearningItem> =
        loaded.catalog.iter().map(|item| (item.id, item)).collect();

    let items = loaded
        .queue
        .into_entries()
        .into_iter()
        .filter_map(|entry| {
            by_id.get(&entry.item_id).map(|item| QueuedItem {
                item: (*item).clone(),
                card: entry.card,
            })
        })
        .collect();

    Ok(Json(ReviewQueueResponse {
        items,
        total_due: loaded.total_due,
        limit: settings.reviews_per_day,
    }))
}

/// POST /api/review/grade
/// Grades one item outside of a session
pub async fn grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<GradeItemRequest>,
) -> Result<Json<GradeItemResponse>> {
    let quality = Quality::from_i32(payload.quality)?;

    let item = state
        .db
        .get_item(payload.item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item {} not found", payload.item_id)))?;

    let settings = state.db.get_settings(auth.learner_id).await?.to_core_settings();
    let algorithm = Sm2::from_settings(&settings);

    let previous = state
        .db
        .get_review_card(auth.learner_id, item.id)
        .await?
        .map(|c| c.to_core_card());
    let starting = previous
        .clone()
        .unwrap_or_else(|| algorithm.initial_state(item.id));

    let now = Utc::now();
    let scheduled = algorithm.schedule(&starting, quality, now)?;

    let outcome = GradeOutcome {
        result: ReviewResult {
            item_id: item.id,
            quality,
            was_correct: quality.is_correct(),
        },
        previous,
        card: scheduled.card,
        completed: false,
    };
    persist_outcome(&state.db, auth.learner_id, None, ReviewMode::Recall, &outcome, now).await?;

    Ok(Json(GradeItemResponse {
        was_correct: outcome.result.was_correct,
        next_review: scheduled.next_review,
        card: outcome.card,
    }))
}
