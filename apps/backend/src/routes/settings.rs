//! Settings endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// GET /api/settings
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<ReviewSettings>> {
    let settings = state.db.get_settings(auth.learner_id).await?;
    Ok(Json(settings.to_core_settings()))
}

/// PUT /api/settings
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<ReviewSettings>> {
    let current = state.db.get_settings(auth.learner_id).await?.to_core_settings();

    let updated = request.apply(&current);
    updated.validate()?;

    state
        .db
        .upsert_settings(&DbLearnerSettings::from_core_settings(auth.learner_id, &updated))
        .await?;

    tracing::info!("Updated review settings for learner {}", auth.learner_id);

    Ok(Json(updated))
}
