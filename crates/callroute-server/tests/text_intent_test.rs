mod common;

use axum::{
    body::{Body, Bytes},
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use callroute_server::app;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

fn chat_provider(status: StatusCode, content: &'static str, counter: common::HitCounter) -> Router {
    Router::new().route(
        "/v1/chat/completions",
        post(move |body: Bytes| {
            let counter = counter.clone();
            async move {
                counter.hit();
                let request: Value = serde_json::from_slice(&body).unwrap();
                assert_eq!(request["model"], "gpt-3.5-turbo");
                (status, Json(common::chat_reply(content)))
            }
        }),
    )
}

fn assert_fallback(json: &Value, text: &str) {
    assert_eq!(json["text"], text);
    assert_eq!(json["intent"], "general");
    assert_eq!(json["name"], Value::Null);
    assert_eq!(json["response"], "Θα σας συνδέσω με την υποδοχή.");
    assert_eq!(json["confidence"], 0.0);
    assert_eq!(json["provider"], "openai");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_text_intent_classifies_with_text_model() {
    let counter = common::HitCounter::default();
    let reply = r#"{"intent": "accounting", "confidence": 0.85, "response": "Θα σας συνδέσω με το λογιστήριο.", "name": "Μαρία"}"#;
    let base_url = common::start_provider(chat_provider(StatusCode::OK, reply, counter.clone())).await;
    let app = app(common::connected_state(&base_url));

    let response = app
        .oneshot(common::json_request(
            "/text_intent",
            json!({"text": "Είμαι η Μαρία, έχω ερώτηση για το τιμολόγιο"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["text"], "Είμαι η Μαρία, έχω ερώτηση για το τιμολόγιο");
    assert_eq!(json["intent"], "accounting");
    assert_eq!(json["name"], "Μαρία");
    assert_eq!(json["response"], "Θα σας συνδέσω με το λογιστήριο.");
    assert_eq!(json["confidence"], 0.85);
    assert_eq!(json["provider"], "openai");
    assert!(json.get("error").is_none());
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_text_intent_unparseable_reply_uses_low_confidence_fallback() {
    let counter = common::HitCounter::default();
    let base_url = common::start_provider(chat_provider(
        StatusCode::OK,
        "Sorry, I cannot help with that.",
        counter.clone(),
    ))
    .await;
    let app = app(common::connected_state(&base_url));

    let response = app
        .oneshot(common::json_request("/text_intent", json!({"text": "καλημέρα"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["intent"], "general");
    assert_eq!(json["confidence"], 0.3);
    assert_eq!(json["response"], "Θα σας συνδέσω με την υποδοχή μας.");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_text_intent_provider_error_returns_fallback_payload() {
    let counter = common::HitCounter::default();
    let base_url = common::start_provider(chat_provider(
        StatusCode::INTERNAL_SERVER_ERROR,
        "unused",
        counter.clone(),
    ))
    .await;
    let app = app(common::connected_state(&base_url));

    let response = app
        .oneshot(common::json_request("/text_intent", json!({"text": "βοήθεια"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_fallback(&json, "βοήθεια");
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_text_intent_timeout_returns_fallback_payload() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|_body: Bytes| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(common::chat_reply("{}"))
        }),
    );
    let base_url = common::start_provider(router).await;
    let app = app(common::connected_state(&base_url));

    let response = app
        .oneshot(common::json_request("/text_intent", json!({"text": "εμπρός;"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_fallback(&common::body_json(response).await, "εμπρός;");
}

#[tokio::test]
async fn test_text_intent_without_provider_returns_fallback_payload() {
    let app = app(common::disconnected_state());

    let response = app
        .oneshot(common::json_request("/text_intent", json!({"text": "γεια σας"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_fallback(&json, "γεια σας");
    assert!(json["error"].as_str().unwrap().contains("not available"));
}

#[tokio::test]
async fn test_text_intent_empty_text_skips_provider() {
    let counter = common::HitCounter::default();
    let base_url =
        common::start_provider(chat_provider(StatusCode::OK, "{}", counter.clone())).await;
    let app = app(common::connected_state(&base_url));

    let response = app
        .oneshot(common::json_request("/text_intent", json!({"text": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_fallback(&common::body_json(response).await, "   ");
    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn test_text_intent_malformed_body_returns_fallback_payload() {
    let app = app(common::disconnected_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/text_intent")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_fallback(&common::body_json(response).await, "");
}
