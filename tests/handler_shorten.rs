mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_shorten_text_returns_created_short_url() {
    let server = common::create_test_server(common::create_test_state());

    let response = server.post("/").text("https://practicum.yandex.ru").await;

    response.assert_status(StatusCode::CREATED);
    let code = common::code_of(&response.text());
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_shorten_text_twice_returns_conflict_with_same_url() {
    let server = common::create_test_server(common::create_test_state());

    let first = server.post("/").text("https://google.com").await;
    let second = server.post("/").text("https://google.com").await;

    first.assert_status(StatusCode::CREATED);
    second.assert_status(StatusCode::CONFLICT);
    assert_eq!(first.text(), second.text());
}

#[tokio::test]
async fn test_shorten_text_rejects_invalid_url() {
    let server = common::create_test_server(common::create_test_state());

    for body in ["", "incorrect"] {
        let response = server.post("/").text(body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "invalid_uri");
    }
}

#[tokio::test]
async fn test_shorten_json_rejects_url_with_line_break() {
    let server = common::create_test_server(common::create_test_state());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a\nb" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_uri");
}

#[tokio::test]
async fn test_shorten_json_success_and_conflict() {
    let server = common::create_test_server(common::create_test_state());

    let created = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;
    let repeated = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    created.assert_status(StatusCode::CREATED);
    repeated.assert_status(StatusCode::CONFLICT);

    let created = created.json::<serde_json::Value>();
    let repeated = repeated.json::<serde_json::Value>();
    assert!(created["result"].as_str().unwrap().starts_with(common::BASE_URL));
    assert_eq!(created["result"], repeated["result"]);
}

#[tokio::test]
async fn test_shorten_json_rejects_invalid_url() {
    let server = common::create_test_server(common::create_test_state());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shorten_batch_keeps_correlation_ids() {
    let state = common::create_test_state();
    let existing = state.coder.to_code("https://old.example", 0).await.unwrap();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/shorten/batch")
        .json(&json!([
            { "correlation_id": "first", "original_url": "https://new.example" },
            { "correlation_id": "second", "original_url": "https://old.example" }
        ]))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["correlation_id"], "first");
    assert_eq!(items[1]["correlation_id"], "second");
    assert_eq!(
        items[1]["short_url"],
        format!("{}/{}", common::BASE_URL, existing)
    );
}

#[tokio::test]
async fn test_shorten_batch_rejects_invalid_item() {
    let server = common::create_test_server(common::create_test_state());

    let response = server
        .post("/api/shorten/batch")
        .json(&json!([
            { "correlation_id": "1", "original_url": "incorrect" }
        ]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
