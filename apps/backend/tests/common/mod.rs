//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating learners and catalog items
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use quran_vocab_backend::db::Database;
use quran_vocab_backend::services::sessions::SessionRegistry;
use quran_vocab_backend::{build_router, AppState};

/// Test context containing database connection and router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState {
            db: db.clone(),
            sessions: Arc::new(SessionRegistry::default()),
        };

        Self {
            db,
            app: build_router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test learner and return its ID and token.
    pub async fn create_test_learner(&self, name: Option<&str>) -> (Uuid, String) {
        let learner = self
            .db
            .create_learner(name)
            .await
            .expect("Failed to create test learner");
        (learner.id, learner.token)
    }

    /// Insert catalog items and return their IDs in insertion order.
    pub async fn seed_items(&self, items: &[(&str, &str)]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(items.len());
        for (text, meaning) in items {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO learning_items (text, meaning) VALUES ($1, $2) RETURNING id",
            )
            .bind(*text)
            .bind(*meaning)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to seed learning item");
            ids.push(id);
        }
        ids
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a learner and the items it seeded.
    pub async fn cleanup(&self, learner_id: Uuid, item_ids: &[i64]) {
        // Delete in order due to foreign keys
        let _ = sqlx::query("DELETE FROM reviews WHERE learner_id = $1 OR item_id = ANY($2)")
            .bind(learner_id)
            .bind(item_ids)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM review_cards WHERE learner_id = $1 OR item_id = ANY($2)")
            .bind(learner_id)
            .bind(item_ids)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM learning_items WHERE id = ANY($1)")
            .bind(item_ids)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM learner_settings WHERE learner_id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM learners WHERE id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;
    }
}
