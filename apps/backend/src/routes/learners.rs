//! Learner registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{LearnerStatusResponse, RegisterLearnerRequest, RegisterLearnerResponse};
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/learners/register
/// Creates a learner and returns the bearer token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterLearnerRequest>,
) -> Result<Json<RegisterLearnerResponse>> {
    let learner = state.db.create_learner(payload.name.as_deref()).await?;

    tracing::info!("Registered new learner: {}", learner.id);

    Ok(Json(RegisterLearnerResponse {
        learner_id: learner.id,
        token: learner.token,
    }))
}

/// GET /api/learners/me
pub async fn status(
    Extension(auth): Extension<AuthenticatedLearner>,
    State(state): State<AppState>,
) -> Result<Json<LearnerStatusResponse>> {
    let learner = state
        .db
        .get_learner_by_token(&auth.token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Learner not found".to_string()))?;

    Ok(Json(LearnerStatusResponse {
        learner_id: learner.id,
        name: learner.name,
        last_seen_at: learner.last_seen_at,
    }))
}
