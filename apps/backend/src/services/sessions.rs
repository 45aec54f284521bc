//! In-memory registry of active review sessions.
//!
//! A session lives only in this process. The registry lock serializes
//! gradings within a session; card persistence happens after the lock is
//! released, in the route handler.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use srs_core::{
    DistractorPool, DueQueue, GradeOutcome, LearningItem, Quality, QuizGrading, QuizQuestion,
    ReviewSession, ReviewSettings, SessionSummary, Sm2, SrsError,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{ReviewMode, SessionView};

/// A learner's review session together with what is needed to drive it.
#[derive(Debug)]
pub struct ActiveSession {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub mode: ReviewMode,
    pub started_at: DateTime<Utc>,
    /// Last start, grade or answer; idle time is measured from here
    last_activity_at: DateTime<Utc>,
    session: ReviewSession,
    items: HashMap<i64, LearningItem>,
    /// One question per queue entry in quiz mode, empty otherwise
    questions: Vec<QuizQuestion>,
    algorithm: Sm2,
    grading: QuizGrading,
}

impl ActiveSession {
    /// Start a session over `queue`; quiz questions are built up front.
    pub fn new(
        learner_id: Uuid,
        mode: ReviewMode,
        queue: DueQueue,
        catalog: &[LearningItem],
        settings: &ReviewSettings,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let grading = QuizGrading::from_settings(settings)?;
        let queued: HashSet<i64> = queue.entries().iter().map(|e| e.item_id).collect();
        let items: HashMap<i64, LearningItem> = catalog
            .iter()
            .filter(|item| queued.contains(&item.id))
            .map(|item| (item.id, item.clone()))
            .collect();

        let questions = match mode {
            ReviewMode::Recall => Vec::new(),
            ReviewMode::Quiz => {
                let pool = DistractorPool::new(catalog);
                let mut rng = rand::rng();
                queue
                    .entries()
                    .iter()
                    .map(|entry| {
                        let item = items.get(&entry.item_id).ok_or_else(|| {
                            ApiError::NotFound(format!("Item {} not found", entry.item_id))
                        })?;
                        pool.question(item, settings.distractor_count as usize, &mut rng)
                            .map_err(ApiError::from)
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };

        Ok(Self {
            id: Uuid::new_v4(),
            learner_id,
            mode,
            started_at: now,
            last_activity_at: now,
            session: ReviewSession::start(queue),
            items,
            questions,
            algorithm: Sm2::from_settings(settings),
            grading,
        })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            mode: self.mode,
            state: self.session.state(),
            position: self.session.position(),
            total: self.session.len(),
            remaining: self.session.remaining(),
            current: self
                .session
                .current()
                .and_then(|entry| self.items.get(&entry.item_id).cloned()),
            question: self.current_question().cloned(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        self.session.summary()
    }

    fn current_question(&self) -> Option<&QuizQuestion> {
        self.session.current()?;
        self.questions.get(self.session.position())
    }

    /// Grade the current item with an explicit quality (recall mode).
    pub fn grade(&mut self, quality: Quality, now: DateTime<Utc>) -> Result<GradeOutcome> {
        if self.mode != ReviewMode::Recall {
            return Err(ApiError::BadRequest(
                "Quiz sessions are graded by answering the question".to_string(),
            ));
        }
        let outcome = self.session.grade(&self.algorithm, quality, now)?;
        self.last_activity_at = now;
        Ok(outcome)
    }

    /// Answer the current quiz question; returns the outcome and the right option.
    pub fn answer(&mut self, option_index: usize, now: DateTime<Utc>) -> Result<(GradeOutcome, usize)> {
        if self.mode != ReviewMode::Quiz {
            return Err(ApiError::BadRequest(
                "Recall sessions are graded with a quality rating".to_string(),
            ));
        }
        let question = self.current_question().ok_or(SrsError::SessionFinished)?;
        let correct = question.is_correct(option_index)?;
        let correct_index = question.correct_index;

        let quality = self.grading.quality_for(correct);
        let outcome = self.session.grade(&self.algorithm, quality, now)?;
        self.last_activity_at = now;
        Ok((outcome, correct_index))
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_activity_at > ttl
    }
}

/// Active sessions keyed by id.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, ActiveSession>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::hours(12))
    }
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a new session, dropping any that outlived the TTL.
    pub async fn insert(&self, active: ActiveSession) -> SessionView {
        let now = Utc::now();
        let view = active.view();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} expired review sessions", pruned);
        }

        sessions.insert(active.id, active);
        view
    }

    pub async fn view(&self, session_id: Uuid, learner_id: Uuid) -> Result<SessionView> {
        let sessions = self.sessions.read().await;
        let active = owned(sessions.get(&session_id), learner_id, Utc::now(), self.ttl)?;
        Ok(active.view())
    }

    pub async fn summary(&self, session_id: Uuid, learner_id: Uuid) -> Result<SessionSummary> {
        let sessions = self.sessions.read().await;
        let active = owned(sessions.get(&session_id), learner_id, Utc::now(), self.ttl)?;
        Ok(active.summary())
    }

    pub async fn grade(
        &self,
        session_id: Uuid,
        learner_id: Uuid,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<(GradeOutcome, SessionView)> {
        let mut sessions = self.sessions.write().await;
        let active = owned_mut(sessions.get_mut(&session_id), learner_id, now, self.ttl)?;
        let outcome = active.grade(quality, now)?;
        Ok((outcome, active.view()))
    }

    pub async fn answer(
        &self,
        session_id: Uuid,
        learner_id: Uuid,
        option_index: usize,
        now: DateTime<Utc>,
    ) -> Result<(GradeOutcome, usize, SessionView)> {
        let mut sessions = self.sessions.write().await;
        let active = owned_mut(sessions.get_mut(&session_id), learner_id, now, self.ttl)?;
        let (outcome, correct_index) = active.answer(option_index, now)?;
        Ok((outcome, correct_index, active.view()))
    }

    pub async fn remove(&self, session_id: Uuid, learner_id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        owned(sessions.get(&session_id), learner_id, Utc::now(), self.ttl)?;
        sessions.remove(&session_id);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn session_not_found() -> ApiError {
    ApiError::NotFound("Session not found".to_string())
}

/// The session if it belongs to `learner_id` and has not gone idle past `ttl`.
fn owned(
    active: Option<&ActiveSession>,
    learner_id: Uuid,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<&ActiveSession> {
    active
        .filter(|s| s.learner_id == learner_id && !s.is_expired(now, ttl))
        .ok_or_else(session_not_found)
}

fn owned_mut(
    active: Option<&mut ActiveSession>,
    learner_id: Uuid,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<&mut ActiveSession> {
    active
        .filter(|s| s.learner_id == learner_id && !s.is_expired(now, ttl))
        .ok_or_else(session_not_found)
}
