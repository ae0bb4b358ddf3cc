mod common;

use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_shorten_creates_record() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/a/very/long/path?x=1" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["shortCode"].as_str().unwrap();

    assert_eq!(code.len(), 7);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["originalUrl"], "https://example.com/a/very/long/path?x=1");
    assert_eq!(body["shortUrl"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(body["clicks"], 0);
    assert!(body["_id"].is_string());
    assert!(body["createdAt"].is_string());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_shorten_same_url_returns_existing() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let first = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/page" }))
        .await;
    first.assert_status(axum::http::StatusCode::CREATED);

    let second = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/page" }))
        .await;
    second.assert_status_ok();

    let first = first.json::<Value>();
    let second = second.json::<Value>();

    assert_eq!(first["shortCode"], second["shortCode"]);
    assert_eq!(first["_id"], second["_id"]);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_shorten_normalizes_before_dedup() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let first = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://EXAMPLE.com:443/page" }))
        .await
        .json::<Value>();

    let second = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "  https://example.com/page  " }))
        .await
        .json::<Value>();

    assert_eq!(first["originalUrl"], "https://example.com/page");
    assert_eq!(first["shortCode"], second["shortCode"]);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_shorten_distinct_urls_get_distinct_codes() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server(state);

    let mut codes = HashSet::new();
    for i in 0..25 {
        let body = server
            .post("/api/shorten")
            .json(&json!({ "originalUrl": format!("https://example.com/{i}") }))
            .await
            .json::<Value>();

        codes.insert(body["shortCode"].as_str().unwrap().to_string());
    }

    assert_eq!(codes.len(), 25);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    for bad in ["", "not a url", "ftp://example.com/file", "mailto:a@b.c"] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "originalUrl": bad }))
            .await;

        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["code"], "invalid_url", "input: {bad:?}");
        assert!(body["error"].is_string());
    }

    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_unknown_fields() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "customCode": "mine" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "validation_error");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_shorten_missing_field() {
    let (state, _repo) = common::create_test_state();
    let server = common::test_server(state);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_too_long_url() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let long_url = format!("https://example.com/{}", "a".repeat(2100));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": long_url }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "invalid_url");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_shorten_length_limit_applies_after_trimming() {
    let (state, repo) = common::create_test_state();
    let server = common::test_server(state);

    let prefix = "https://example.com/";
    let url = format!("{prefix}{}", "a".repeat(2040 - prefix.len()));
    let padded = format!("{}{url}{}", " ".repeat(10), " ".repeat(10));
    assert!(padded.len() > 2048);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": padded }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["originalUrl"], url);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_shorten_generation_exhausted() {
    let generator = Arc::new(common::FixedCodeGenerator::new("fixed01"));
    let (state, repo) = common::create_test_state_with(generator.clone(), None);
    let server = common::test_server(state);

    server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/first" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/second" }))
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["code"], "generation_exhausted");
    assert_eq!(repo.len(), 1);
    assert_eq!(generator.calls(), 11);
}

#[tokio::test]
async fn test_shorten_rate_limited() {
    use shortlink::config::RateLimit;
    use shortlink::routes::RouterOptions;

    let (state, _repo) = common::create_test_state();
    let options = RouterOptions {
        rate_limit: RateLimit {
            per_second: 60,
            burst: 2,
            behind_proxy: false,
        },
        ..RouterOptions::default()
    };
    let server = common::test_server_with(state, &options);

    for i in 0..2 {
        server
            .post("/api/shorten")
            .json(&json!({ "originalUrl": format!("https://example.com/{i}") }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/3" }))
        .await;

    response.assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<Value>()["code"], "rate_limited");

    // Reads are not rate limited.
    server.get("/api/urls").await.assert_status_ok();
}
