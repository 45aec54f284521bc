//! Review session API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

/// Test a recall session walks the queue and completes.
#[tokio::test]
#[ignore = "requires database"]
async fn test_recall_session_to_completion() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()).await;
    let auth = TestContext::auth_header_value(&token);

    let response = server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::start_session_request("recall"))
        .await;

    response.assert_status_ok();
    let mut session: serde_json::Value = response.json();
    let session_id = session["session_id"].as_str().unwrap().to_string();
    assert_eq!(session["state"], "in_progress");
    assert!(session["question"].is_null());

    while session["state"] == "in_progress" {
        let response = server
            .post(&format!("/api/sessions/{}/grade", session_id))
            .add_header(axum::http::header::AUTHORIZATION, auth.clone())
            .json(&fixtures::session_grade_request(4))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert!(body["persist_error"].is_null());
        session = body["session"].clone();
    }

    let response = server
        .get(&format!("/api/sessions/{}/summary", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await;
    response.assert_status_ok();
    let summary: serde_json::Value = response.json();
    assert_eq!(summary["state"], "completed");
    assert_eq!(summary["needs_review"], 0);

    for id in &item_ids {
        let card = ctx.db.get_review_card(learner_id, *id).await.unwrap();
        assert!(card.is_some());
    }

    // Completed sessions reject further grading
    let response = server
        .post(&format!("/api/sessions/{}/grade", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::session_grade_request(4))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Cleanup
    ctx.cleanup(learner_id, &item_ids).await;
}

/// Test quiz answers are mapped onto the quality scale.
#[tokio::test]
#[ignore = "requires database"]
async fn test_quiz_session_answer() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (learner_id, token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()).await;
    let auth = TestContext::auth_header_value(&token);

    let response = server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::start_session_request("quiz"))
        .await;

    response.assert_status_ok();
    let session: serde_json::Value = response.json();
    let session_id = session["session_id"].as_str().unwrap().to_string();
    let options = session["question"]["options"].as_array().unwrap();
    assert!(options.len() >= 2);
    assert!(session["question"].get("correct_index").is_none());

    let response = server
        .post(&format!("/api/sessions/{}/answer", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::quiz_answer_request(0))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let correct = body["correct_option"].as_u64().unwrap() == 0;
    let expected_quality = if correct { 5 } else { 1 };
    assert_eq!(body["result"]["quality"], expected_quality);
    assert_eq!(body["result"]["was_correct"], correct);
    assert_eq!(body["session"]["position"], 1);

    // Recall grading is not accepted in a quiz session
    let response = server
        .post(&format!("/api/sessions/{}/grade", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::session_grade_request(5))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Cleanup
    ctx.cleanup(learner_id, &item_ids).await;
}

/// Test sessions are private to the learner that started them.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_not_visible_to_other_learner() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_learner(None).await;
    let (other_id, other_token) = ctx.create_test_learner(None).await;
    let item_ids = ctx.seed_items(&fixtures::vocabulary()[..2]).await;

    let response = server
        .post("/api/sessions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&owner_token),
        )
        .json(&fixtures::start_session_request("recall"))
        .await;
    let session: serde_json::Value = response.json();
    let session_id = session["session_id"].as_str().unwrap().to_string();

    let response = server
        .get(&format!("/api/sessions/{}", session_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&other_token),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .delete(&format!("/api/sessions/{}", session_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&owner_token),
        )
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    // Cleanup
    ctx.cleanup(owner_id, &item_ids).await;
    ctx.cleanup(other_id, &[]).await;
}
