//! Review queue and direct grading API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

fn queued_ids(body: &serde_json::Value) -> Vec<i64> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["item"]["id"].as_i64().unwrap())
        .collect()
}

/// Test never-reviewed items are all due.
#[tokio::test]
#[ignore = "requires database"]
async fn test_queue_includes_unseen_items() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()).await;

    let response = server
        .get("/api/review/queue")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let queued = queued_ids(&body);
    for id in &item_ids {
        assert!(queued.contains(id));
    }
    assert_eq!(body["limit"], 200);

    // Cleanup
    ctx.cleanup(learner_id, &item_ids).await;
}

/// Test grading an item schedules it out of today's queue.
#[tokio::test]
#[ignore = "requires database"]
async fn test_grade_creates_card_and_removes_from_queue() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()).await;

    let response = server
        .post("/api/review/grade")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::grade_request(item_ids[0], 5))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["card"]["repetitions"], 1);
    assert_eq!(body["card"]["interval_days"], 1);
    assert_eq!(body["was_correct"], true);

    let stored = ctx
        .db
        .get_review_card(learner_id, item_ids[0])
        .await
        .unwrap()
        .expect("card should be created on first grading");
    assert_eq!(stored.repetitions, 1);

    let response = server
        .get("/api/review/queue")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;
    let body: serde_json::Value = response.json();
    let queued = queued_ids(&body);
    assert!(!queued.contains(&item_ids[0]));
    assert!(queued.contains(&item_ids[1]));

    // Cleanup
    ctx.cleanup(learner_id, &item_ids).await;
}

/// Test a second grading updates the card in place.
#[tokio::test]
#[ignore = "requires database"]
async fn test_grade_updates_existing_card() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()[..1]).await;

    for quality in [5, 5, 1] {
        server
            .post("/api/review/grade")
            .add_header(
                axum::http::header::AUTHORIZATION,
                TestContext::auth_header_value(&token),
            )
            .json(&fixtures::grade_request(item_ids[0], quality))
            .await
            .assert_status_ok();
    }

    let stored = ctx
        .db
        .get_review_card(learner_id, item_ids[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.repetitions, 0);
    assert_eq!(stored.interval_days, 1);

    // Cleanup
    ctx.cleanup(learner_id, &item_ids).await;
}

/// Test out-of-range quality is rejected without touching the store.
#[tokio::test]
#[ignore = "requires database"]
async fn test_grade_rejects_invalid_quality() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()[..1]).await;

    let response = server
        .post("/api/review/grade")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::grade_request(item_ids[0], 6))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx
        .db
        .get_review_card(learner_id, item_ids[0])
        .await
        .unwrap()
        .is_none());

    // Cleanup
    ctx.cleanup(learner_id, &item_ids).await;
}

/// Test grading an item missing from the catalog.
#[tokio::test]
#[ignore = "requires database"]
async fn test_grade_unknown_item() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;

    let response = server
        .post("/api/review/grade")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::grade_request(i64::MAX, 4))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    // Cleanup
    ctx.cleanup(learner_id, &[]).await;
}

/// Test progress reflects graded cards.
#[tokio::test]
#[ignore = "requires database"]
async fn test_progress_after_grading() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()).await;

    for id in &item_ids[..2] {
        server
            .post("/api/review/grade")
            .add_header(
                axum::http::header::AUTHORIZATION,
                TestContext::auth_header_value(&token),
            )
            .json(&fixtures::grade_request(*id, 4))
            .await
            .assert_status_ok();
    }

    let response = server
        .get("/api/progress")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["reviewed"], 2);
    assert_eq!(body["reviews_today"], 2);
    assert_eq!(body["mastered"], 0);

    // Cleanup
    ctx.cleanup(learner_id, &item_ids).await;
}
