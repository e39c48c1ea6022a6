//! End-to-end tests driving the API router over the in-memory stores.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pollcast::db::memory::{MemoryPollStore, MemoryRefreshStore, MemoryUserStore};
use pollcast::routes::api_router;
use pollcast::state::AppState;
use pollcast::utils::tokens::TokenService;

const ACCESS_SECRET: &str = "test-access-secret";
const REFRESH_SECRET: &str = "test-refresh-secret";

fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryPollStore::default()),
        Arc::new(MemoryUserStore::default()),
        Arc::new(MemoryRefreshStore::default()),
        Arc::new(TokenService::new(
            ACCESS_SECRET,
            REFRESH_SECRET,
            Duration::minutes(15),
            Duration::days(7),
        )),
    );
    api_router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookies: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, Vec<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body, set_cookies)
}

fn cookie_value(set_cookies: &[String], name: &str) -> Option<String> {
    set_cookies.iter().find_map(|cookie| {
        let head = cookie.split(';').next()?;
        let (cookie_name, value) = head.split_once('=')?;
        (cookie_name == name).then(|| value.to_string())
    })
}

struct Session {
    user_id: String,
    access: String,
    refresh: String,
}

impl Session {
    fn cookies(&self) -> String {
        format!("accessToken={}; refreshToken={}", self.access, self.refresh)
    }

    fn access_only(&self) -> String {
        format!("accessToken={}", self.access)
    }
}

async fn signup(app: &Router, email: &str) -> Session {
    let (status, body, set_cookies) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Pat", "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    Session {
        user_id: body["user"]["id"].as_str().unwrap().to_string(),
        access: cookie_value(&set_cookies, "accessToken").unwrap(),
        refresh: cookie_value(&set_cookies, "refreshToken").unwrap(),
    }
}

async fn create_poll(app: &Router, session: &Session, question: &str, choices: &[&str]) -> Value {
    let (status, body, _) = send(
        app,
        "POST",
        "/api/votes",
        Some(&session.access_only()),
        Some(json!({ "question": question, "choices": choices })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn signup_sets_both_token_cookies_and_duplicate_email_is_rejected() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;
    assert!(!session.access.is_empty());
    assert!(!session.refresh.is_empty());

    let (status, body, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Pat", "email": "pat@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_verifies_password() {
    let app = test_app();
    signup(&app, "pat@example.com").await;

    let (status, _, set_cookies) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "pat@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookie_value(&set_cookies, "accessToken").is_some());
    assert!(cookie_value(&set_cookies, "refreshToken").is_some());

    let (status, body, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "pat@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["requiresRefresh"].is_null());
}

#[tokio::test]
async fn poll_creation_requires_a_token() {
    let app = test_app();
    let (status, body, _) = send(
        &app,
        "POST",
        "/api/votes",
        None,
        Some(json!({ "question": "Best fruit?", "choices": ["Apple", "Banana"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");
    assert!(body["requiresRefresh"].is_null());
}

#[tokio::test]
async fn poll_creation_validates_question_and_choice_count() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;

    for payload in [
        json!({ "question": "   ", "choices": ["Apple", "Banana"] }),
        json!({ "question": "Best fruit?", "choices": ["Apple"] }),
        json!({ "question": "Best fruit?", "choices": ["Apple", "  "] }),
    ] {
        let (status, body, _) = send(
            &app,
            "POST",
            "/api/votes",
            Some(&session.access_only()),
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn duplicate_questions_are_rejected() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;
    create_poll(&app, &session, "Best fruit?", &["Apple", "Banana"]).await;

    let (status, body, _) = send(
        &app,
        "POST",
        "/api/votes",
        Some(&session.access_only()),
        Some(json!({ "question": "Best fruit?", "choices": ["Cats", "Dogs"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "DUPLICATE_QUESTION");
}

#[tokio::test]
async fn casting_a_vote_updates_public_results() {
    let app = test_app();
    let creator = signup(&app, "creator@example.com").await;
    let poll = create_poll(&app, &creator, "Best fruit?", &["Apple", "Banana"]).await;
    let poll_id = poll["id"].as_str().unwrap();
    let apple_id = poll["choices"][0]["id"].as_str().unwrap();

    // both choices start at zero
    assert_eq!(poll["choices"][0]["votes"], json!(0));
    assert_eq!(poll["choices"][1]["votes"], json!(0));
    assert_eq!(poll["totalVotes"], json!(0));

    let voter = signup(&app, "voter@example.com").await;
    let (status, body, _) = send(
        &app,
        "POST",
        &format!("/api/votes/{poll_id}/cast"),
        Some(&voter.access_only()),
        Some(json!({ "choiceId": apple_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vote cast successfully");

    let results = &body["results"];
    assert_eq!(results["totalVotes"], json!(1));
    assert_eq!(results["choices"][0]["votes"], json!(1));
    assert_eq!(results["choices"][0]["percentage"], json!(100.0));
    assert_eq!(results["choices"][1]["votes"], json!(0));
    assert_eq!(results["choices"][1]["percentage"], json!(0.0));

    // results are public: no credentials attached
    let (status, body, _) = send(
        &app,
        "GET",
        &format!("/api/votes/{poll_id}/results"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], "Best fruit?");
    assert_eq!(body["totalVotes"], json!(1));
}

#[tokio::test]
async fn second_vote_by_same_user_is_rejected_and_counters_unchanged() {
    let app = test_app();
    let creator = signup(&app, "creator@example.com").await;
    let poll = create_poll(&app, &creator, "Best fruit?", &["Apple", "Banana"]).await;
    let poll_id = poll["id"].as_str().unwrap();
    let apple_id = poll["choices"][0]["id"].as_str().unwrap();
    let banana_id = poll["choices"][1]["id"].as_str().unwrap();

    let voter = signup(&app, "voter@example.com").await;
    let cast_uri = format!("/api/votes/{poll_id}/cast");
    let (status, _, _) = send(
        &app,
        "POST",
        &cast_uri,
        Some(&voter.access_only()),
        Some(json!({ "choiceId": apple_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // a different choice makes no difference, the user already voted
    let (status, body, _) = send(
        &app,
        "POST",
        &cast_uri,
        Some(&voter.access_only()),
        Some(json!({ "choiceId": banana_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ALREADY_VOTED");

    let (_, results, _) = send(
        &app,
        "GET",
        &format!("/api/votes/{poll_id}/results"),
        None,
        None,
    )
    .await;
    assert_eq!(results["totalVotes"], json!(1));
    assert_eq!(results["choices"][0]["votes"], json!(1));
    assert_eq!(results["choices"][1]["votes"], json!(0));
}

#[tokio::test]
async fn unknown_choice_and_missing_choice_are_rejected_without_mutation() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;
    let poll = create_poll(&app, &session, "Best fruit?", &["Apple", "Banana"]).await;
    let poll_id = poll["id"].as_str().unwrap();
    let cast_uri = format!("/api/votes/{poll_id}/cast");

    let (status, body, _) = send(
        &app,
        "POST",
        &cast_uri,
        Some(&session.access_only()),
        Some(json!({ "choiceId": "not-a-choice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_CHOICE");

    let (status, body, _) = send(
        &app,
        "POST",
        &cast_uri,
        Some(&session.access_only()),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A choice ID is required to cast a vote.");

    let (_, results, _) = send(
        &app,
        "GET",
        &format!("/api/votes/{poll_id}/results"),
        None,
        None,
    )
    .await;
    assert_eq!(results["totalVotes"], json!(0));
}

#[tokio::test]
async fn unknown_poll_is_a_404() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;

    let (status, _, _) = send(
        &app,
        "GET",
        "/api/votes/0123456789abcdef01234567/results",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/votes/0123456789abcdef01234567/cast",
        Some(&session.access_only()),
        Some(json!({ "choiceId": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_access_with_refresh_cookie_asks_for_refresh_then_recovers() {
    let app = test_app();
    let creator = signup(&app, "creator@example.com").await;
    let poll = create_poll(&app, &creator, "Best fruit?", &["Apple", "Banana"]).await;
    let poll_id = poll["id"].as_str().unwrap();
    let apple_id = poll["choices"][0]["id"].as_str().unwrap();

    let voter = signup(&app, "voter@example.com").await;

    // Same secrets, negative TTL: a genuinely expired access token for this
    // user (past the verifier's 60s leeway).
    let expired_access = TokenService::new(
        ACCESS_SECRET,
        REFRESH_SECRET,
        Duration::seconds(-300),
        Duration::days(7),
    )
    .issue_access(&voter.user_id)
    .unwrap();

    let cast_uri = format!("/api/votes/{poll_id}/cast");
    let stale_cookies = format!(
        "accessToken={expired_access}; refreshToken={}",
        voter.refresh
    );
    let (status, body, _) = send(
        &app,
        "POST",
        &cast_uri,
        Some(&stale_cookies),
        Some(json!({ "choiceId": apple_id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["requiresRefresh"], json!(true));

    // the refresh exchange mints a new access token
    let (status, _, set_cookies) = send(
        &app,
        "POST",
        "/api/auth/refresh-token",
        Some(&format!("refreshToken={}", voter.refresh)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = cookie_value(&set_cookies, "accessToken").unwrap();

    // retrying the same cast with the fresh token succeeds
    let (status, body, _) = send(
        &app,
        "POST",
        &cast_uri,
        Some(&format!("accessToken={new_access}")),
        Some(json!({ "choiceId": apple_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["totalVotes"], json!(1));
}

#[tokio::test]
async fn refresh_cookie_without_access_token_asks_for_refresh() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;

    let (status, body, _) = send(
        &app,
        "POST",
        "/api/votes",
        Some(&format!("refreshToken={}", session.refresh)),
        Some(json!({ "question": "Best fruit?", "choices": ["Apple", "Banana"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["requiresRefresh"], json!(true));
}

#[tokio::test]
async fn tampered_access_token_gets_a_plain_401_even_with_refresh_present() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;

    let cookies = format!("accessToken=garbage; refreshToken={}", session.refresh);
    let (status, body, _) = send(
        &app,
        "POST",
        "/api/votes",
        Some(&cookies),
        Some(json!({ "question": "Best fruit?", "choices": ["Apple", "Banana"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["requiresRefresh"].is_null());
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let app = test_app();
    let session = signup(&app, "pat@example.com").await;

    let (status, _, set_cookies) = send(
        &app,
        "POST",
        "/api/auth/logout",
        Some(&session.cookies()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // both cookies are cleared
    assert_eq!(cookie_value(&set_cookies, "accessToken").unwrap(), "");
    assert_eq!(cookie_value(&set_cookies, "refreshToken").unwrap(), "");

    // the revoked refresh token no longer exchanges, even though its JWT
    // signature is still valid
    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/refresh-token",
        Some(&format!("refreshToken={}", session.refresh)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_casts_from_one_user_succeed_exactly_once() {
    let app = test_app();
    let creator = signup(&app, "creator@example.com").await;
    let poll = create_poll(&app, &creator, "Best fruit?", &["Apple", "Banana"]).await;
    let poll_id = poll["id"].as_str().unwrap().to_string();
    let apple_id = poll["choices"][0]["id"].as_str().unwrap().to_string();

    let voter = signup(&app, "voter@example.com").await;
    let cookies = voter.access_only();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let uri = format!("/api/votes/{poll_id}/cast");
        let cookies = cookies.clone();
        let body = json!({ "choiceId": apple_id });
        handles.push(tokio::spawn(async move {
            let (status, _, _) = send(&app, "POST", &uri, Some(&cookies), Some(body)).await;
            status
        }));
    }

    let mut successes = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == StatusCode::OK {
            successes += 1;
        } else {
            assert!(
                status == StatusCode::BAD_REQUEST
                    || status == StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
    assert_eq!(successes, 1);

    let (_, results, _) = send(
        &app,
        "GET",
        &format!("/api/votes/{poll_id}/results"),
        None,
        None,
    )
    .await;
    assert_eq!(results["totalVotes"], json!(1));
}
