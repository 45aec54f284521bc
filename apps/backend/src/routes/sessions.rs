//! Review session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use srs_core::{GradeOutcome, Quality};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::routes::review::{load_queue, persist_outcome};
use crate::services::sessions::ActiveSession;
use crate::AppState;

/// POST /api/sessions
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionView>> {
    let now = Utc::now();
    let settings = state.db.get_settings(auth.learner_id).await?.to_core_settings();
    let loaded = load_queue(&state.db, auth.learner_id, &settings, now).await?;

    let active = ActiveSession::new(
        auth.learner_id,
        payload.mode,
        loaded.queue,
        &loaded.catalog,
        &settings,
        now,
    )?;
    let view = state.sessions.insert(active).await;

    tracing::info!(
        "Learner {} started {} session {} with {} items",
        auth.learner_id,
        payload.mode.as_str(),
        view.session_id,
        view.total
    );

    Ok(Json(view))
}

/// GET /api/sessions/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.view(session_id, auth.learner_id).await?;
    Ok(Json(view))
}

/// POST /api/sessions/{id}/grade
pub async fn grade(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<SessionGradeRequest>,
) -> Result<Json<SessionGradeResponse>> {
    let quality = Quality::from_i32(payload.quality)?;
    let now = Utc::now();

    let (outcome, view) = state
        .sessions
        .grade(session_id, auth.learner_id, quality, now)
        .await?;

    let saved = persist_outcome(
        &state.db,
        auth.learner_id,
        Some(session_id),
        ReviewMode::Recall,
        &outcome,
        now,
    )
    .await;

    Ok(Json(grade_response(session_id, outcome, None, saved, view)))
}

/// POST /api/sessions/{id}/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<QuizAnswerRequest>,
) -> Result<Json<SessionGradeResponse>> {
    let now = Utc::now();

    let (outcome, correct_index, view) = state
        .sessions
        .answer(session_id, auth.learner_id, payload.option_index, now)
        .await?;

    let saved = persist_outcome(
        &state.db,
        auth.learner_id,
        Some(session_id),
        ReviewMode::Quiz,
        &outcome,
        now,
    )
    .await;

    Ok(Json(grade_response(
        session_id,
        outcome,
        Some(correct_index),
        saved,
        view,
    )))
}

/// GET /api/sessions/{id}/summary
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>> {
    let summary = state.sessions.summary(session_id, auth.learner_id).await?;
    Ok(Json(summary))
}

/// DELETE /api/sessions/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions.remove(session_id, auth.learner_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The session has already advanced; a failed save is reported, not raised.
fn grade_response(
    session_id: Uuid,
    outcome: GradeOutcome,
    correct_option: Option<usize>,
    saved: Result<()>,
    session: SessionView,
) -> SessionGradeResponse {
    let persist_error = saved.err().map(|e| {
        tracing::warn!(
            "Failed to save review of item {} in session {}: {}",
            outcome.result.item_id,
            session_id,
            e
        );
        e.to_string()
    });

    SessionGradeResponse {
        result: outcome.result,
        card: outcome.card,
        correct_option,
        persist_error,
        session,
    }
}
