//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Learner Repository ===

    /// Create a new learner with generated token
    pub async fn create_learner(&self, name: Option<&str>) -> Result<Learner> {
        let token = Uuid::new_v4().to_string();
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            INSERT INTO learners (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        // Create default settings for the learner
        sqlx::query(
            r#"
            INSERT INTO learner_settings (learner_id)
            VALUES ($1)
            "#,
        )
        .bind(learner.id)
        .execute(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Get learner by token
    pub async fn get_learner_by_token(&self, token: &str) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM learners
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Update learner last_seen_at timestamp
    pub async fn update_last_seen(&self, learner_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE learners
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(learner_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Catalog Repository ===

    /// Get all live catalog items, in id order
    pub async fn list_items(&self) -> Result<Vec<DbLearningItem>> {
        let items = sqlx::query_as::<_, DbLearningItem>(
            r#"
            SELECT id, text, meaning
            FROM learning_items
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Get catalog item by ID
    pub async fn get_item(&self, item_id: i64) -> Result<Option<DbLearningItem>> {
        let item = sqlx::query_as::<_, DbLearningItem>(
            r#"
            SELECT id, text, meaning
            FROM learning_items
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Count live catalog items
    pub async fn count_items(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM learning_items WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    // === Review Card Repository ===

    /// Get a learner's card for one item
    pub async fn get_review_card(
        &self,
        learner_id: Uuid,
        item_id: i64,
    ) -> Result<Option<DbReviewCard>> {
        let card = sqlx::query_as::<_, DbReviewCard>(
            r#"
            SELECT learner_id, item_id, repetitions, interval_days, ease_factor,
                   last_review, next_review, created_at, updated_at
            FROM review_cards
            WHERE learner_id = $1 AND item_id = $2
            "#,
        )
        .bind(learner_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Get all of a learner's cards for live catalog items
    pub async fn list_review_cards(&self, learner_id: Uuid) -> Result<Vec<DbReviewCard>> {
        let cards = sqlx::query_as::<_, DbReviewCard>(
            r#"
            SELECT rc.learner_id, rc.item_id, rc.repetitions, rc.interval_days, rc.ease_factor,
                   rc.last_review, rc.next_review, rc.created_at, rc.updated_at
            FROM review_cards rc
            JOIN learning_items li ON li.id = rc.item_id
            WHERE rc.learner_id = $1 AND li.deleted_at IS NULL
            ORDER BY rc.item_id
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Create the card on first grading, overwrite it afterwards
    pub async fn upsert_review_card(&self, card: &DbReviewCard) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO review_cards (learner_id, item_id, repetitions, interval_days,
                                      ease_factor, last_review, next_review)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (learner_id, item_id) DO UPDATE SET
                repetitions = EXCLUDED.repetitions,
                interval_days = EXCLUDED.interval_days,
                ease_factor = EXCLUDED.ease_factor,
                last_review = EXCLUDED.last_review,
                next_review = EXCLUDED.next_review,
                updated_at = NOW()
            "#,
        )
        .bind(card.learner_id)
        .bind(card.item_id)
        .bind(card.repetitions)
        .bind(card.interval_days)
        .bind(card.ease_factor)
        .bind(card.last_review)
        .bind(card.next_review)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Review Repository ===

    /// Insert a review record
    pub async fn insert_review(&self, review: &DbReview) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, learner_id, item_id, session_id, mode, quality, was_correct,
                                 interval_before, interval_after, ease_before, ease_after, reviewed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(review.id)
        .bind(review.learner_id)
        .bind(review.item_id)
        .bind(review.session_id)
        .bind(&review.mode)
        .bind(review.quality)
        .bind(review.was_correct)
        .bind(review.interval_before)
        .bind(review.interval_after)
        .bind(review.ease_before)
        .bind(review.ease_after)
        .bind(review.reviewed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count reviews since a timestamp
    pub async fn count_reviews_since(&self, learner_id: Uuid, since: DateTime<Utc>) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM reviews
            WHERE learner_id = $1 AND reviewed_at >= $2
            "#,
        )
        .bind(learner_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("count"))
    }

    // === Settings Repository ===

    /// Get settings for a learner
    pub async fn get_settings(&self, learner_id: Uuid) -> Result<DbLearnerSettings> {
        let settings = sqlx::query_as::<_, DbLearnerSettings>(
            r#"
            SELECT learner_id, reviews_per_day, distractor_count, update_ease_on_failure,
                   quiz_incorrect_quality, created_at, updated_at
            FROM learner_settings
            WHERE learner_id = $1
            "#,
        )
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await?
        .unwrap_or_else(|| DbLearnerSettings::default_for_learner(learner_id));

        Ok(settings)
    }

    /// Upsert learner settings
    pub async fn upsert_settings(&self, settings: &DbLearnerSettings) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO learner_settings (learner_id, reviews_per_day, distractor_count,
                                          update_ease_on_failure, quiz_incorrect_quality)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (learner_id) DO UPDATE SET
                reviews_per_day = EXCLUDED.reviews_per_day,
                distractor_count = EXCLUDED.distractor_count,
                update_ease_on_failure = EXCLUDED.update_ease_on_failure,
                quiz_incorrect_quality = EXCLUDED.quiz_incorrect_quality,
                updated_at = NOW()
            "#,
        )
        .bind(settings.learner_id)
        .bind(settings.reviews_per_day)
        .bind(settings.distractor_count)
        .bind(settings.update_ease_on_failure)
        .bind(settings.quiz_incorrect_quality)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
