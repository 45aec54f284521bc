//! Progress endpoint

use axum::{extract::State, Extension, Json};
use chrono::{NaiveTime, Utc};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// GET /api/progress
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<ProgressResponse>> {
    let now = Utc::now();

    let cards: Vec<ReviewCard> = state
        .db
        .list_review_cards(auth.learner_id)
        .await?
        .iter()
        .map(DbReviewCard::to_core_card)
        .collect();
    let catalog_size = state.db.count_items().await?;

    let start_of_day = now.date_naive().and_time(NaiveTime::default()).and_utc();
    let reviews_today = state
        .db
        .count_reviews_since(auth.learner_id, start_of_day)
        .await?;

    Ok(Json(ProgressResponse {
        summary: ProgressSummary::from_cards(&cards, catalog_size.max(0) as usize, now),
        reviews_today,
    }))
}
