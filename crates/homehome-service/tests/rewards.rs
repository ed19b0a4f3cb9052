//! Affection and login bonus integration tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use chrono::Utc;
use common::TestHarness;
use serde_json::{json, Value};

async fn balance_total(harness: &TestHarness) -> Value {
    let body: Value = harness
        .server
        .get("/v1/currency/balance")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .json();
    body["total"].clone()
}

// ============================================================================
// Affection
// ============================================================================

#[tokio::test]
async fn affection_crossing_thresholds_pays_coins() {
    let harness = TestHarness::new();

    let first: Value = harness
        .server
        .post("/v1/affection/increase")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&json!({"character_id": "mika", "amount": 5}))
        .await
        .json();
    assert_eq!(first["new_points"], 5);
    assert_eq!(first["coins_awarded"], 0);
    assert_eq!(first["threshold_reached"], 0);

    let response = harness
        .server
        .post("/v1/affection/increase")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&json!({"character_id": "mika", "amount": 25}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["new_points"], 30);
    assert_eq!(body["thresholds_crossed"], json!([10, 20, 30]));
    assert_eq!(body["coins_awarded"], 150);
    assert_eq!(body["threshold_reached"], 30);

    assert_eq!(balance_total(&harness).await, 150);
}

#[tokio::test]
async fn affection_is_listed_per_character() {
    let harness = TestHarness::new();

    for (character, amount) in [("mika", 3), ("ren", 12)] {
        harness
            .server
            .post("/v1/affection/increase")
            .add_header(AUTHORIZATION, harness.user_auth_header())
            .json(&json!({"character_id": character, "amount": amount}))
            .await
            .assert_status_ok();
    }

    let body: Value = harness
        .server
        .get("/v1/affection")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .json();
    let characters = body["characters"].as_array().unwrap();
    assert_eq!(characters.len(), 2);
    assert!(characters.contains(&json!({"character_id": "mika", "points": 3})));
    assert!(characters.contains(&json!({"character_id": "ren", "points": 12})));
}

#[tokio::test]
async fn chat_affection_is_capped_by_caller_key() {
    let harness = TestHarness::new();
    let request = json!({
        "character_id": "mika",
        "amount": 1,
        "idempotency_key": "chat:2024-01-02"
    });

    harness
        .server
        .post("/v1/affection/increase")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&request)
        .await
        .assert_status_ok();

    harness
        .server
        .post("/v1/affection/increase")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&request)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_affection_requests_are_rejected() {
    let harness = TestHarness::new();

    for body in [
        json!({"character_id": "Mika!", "amount": 1}),
        json!({"character_id": "mika", "amount": 0}),
        json!({"character_id": "mika", "amount": 101}),
    ] {
        harness
            .server
            .post("/v1/affection/increase")
            .add_header(AUTHORIZATION, harness.user_auth_header())
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// Login bonus
// ============================================================================

#[tokio::test]
async fn first_claim_pays_day_one_and_repeat_is_a_no_op() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/login-bonus/claim")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&json!({}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"coins_earned": 10, "current_streak": 1, "is_new_day": true})
    );

    // No body at all is accepted too.
    let body: Value = harness
        .server
        .post("/v1/login-bonus/claim")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .json();
    assert_eq!(
        body,
        json!({"coins_earned": 0, "current_streak": 1, "is_new_day": false})
    );

    assert_eq!(balance_total(&harness).await, 10);

    let streak: Value = harness
        .server
        .get("/v1/login-bonus/streak")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .json();
    assert_eq!(streak["current_streak"], 1);
    assert_eq!(streak["next_reward"], 15);
}

#[tokio::test]
async fn streak_of_new_user_is_empty() {
    let harness = TestHarness::new();

    let body: Value = harness
        .server
        .get("/v1/login-bonus/streak")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await
        .json();
    assert_eq!(
        body,
        json!({
            "current_streak": 0,
            "last_login_date": null,
            "next_reward": 10,
            "history": []
        })
    );
}

#[tokio::test]
async fn streak_history_lists_claimed_days() {
    let harness = TestHarness::new();
    let today = Utc::now().date_naive().to_string();

    harness
        .server
        .post("/v1/login-bonus/claim")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .json(&json!({}))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/login-bonus/streak")
        .add_header(AUTHORIZATION, harness.user_auth_header())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["history"], json!([today]));
    assert_eq!(body["last_login_date"], today.as_str());
}
