// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use serenity_core::chat::{ChatAssistant, ChatRequest, ReplySource};
use serenity_core::{ExperienceConfig, Mood, RULE_TABLE_VERSION};
use serenity_server::client::HttpChatBackend;
use serenity_server::{router, AppState};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(ExperienceConfig::default(), Some(1)))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn call_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = call(app, method, uri, body).await;
    (status, serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn test_list_and_get_moods() {
    let app = app();
    let (status, moods) = call_json(&app, Method::GET, "/api/moods", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moods.as_array().map(Vec::len), Some(8));
    assert_eq!(moods[0]["name"], "Tired");
    assert_eq!(moods[0]["soundPath"], "/assets/moods/tired_sound.mp3");

    let (status, calm) = call_json(&app, Method::GET, "/api/moods/calm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calm["voicePrompt"], "Breathe in peace, breathe out tension.");

    let (status, body) = call_json(&app, Method::GET, "/api/moods/Grumpy", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Mood not found"}));
}

#[tokio::test]
async fn test_age_groups() {
    let (status, groups) = call_json(&app(), Method::GET, "/api/age-groups", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = groups.as_array().unwrap().iter().map(|g| g["name"].clone()).collect();
    assert_eq!(names, vec![json!("Child"), json!("Kid"), json!("Adult"), json!("Mature")]);
}

#[tokio::test]
async fn test_user_lifecycle() {
    let app = app();
    let new_user = json!({"username": "river", "password": "pw", "ageGroup": "Adult"});

    let (status, created) = call_json(&app, Method::POST, "/api/users", Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user"]["id"], 1);
    assert!(created["user"].get("password").is_none());
    assert_eq!(
        created["preferences"],
        json!({"id": 1, "userId": 1, "volume": 70, "animationSpeed": 50, "brightness": 60, "voiceEnabled": true})
    );

    let (status, body) = call_json(&app, Method::POST, "/api/users", Some(new_user)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");

    let bad_group = json!({"username": "sky", "password": "pw", "ageGroup": "Teen"});
    let (status, _) = call_json(&app, Method::POST, "/api/users", Some(bad_group)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, user) =
        call_json(&app, Method::PUT, "/api/users/1/preferred-mood", Some(json!({"mood": "Calm"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["preferredMood"], "Calm");

    let (status, _) =
        call_json(&app, Method::PUT, "/api/users/1/preferred-mood", Some(json!({"mood": "Grumpy"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        call_json(&app, Method::PUT, "/api/users/42/preferred-mood", Some(json!({"mood": "Calm"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preferences() {
    let app = app();
    let user = json!({"username": "lake", "password": "pw", "ageGroup": "Mature", "preferredMood": "chill"});
    let (status, _) = call_json(&app, Method::POST, "/api/users", Some(user)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, prefs) = call_json(&app, Method::GET, "/api/users/1/preferences", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["volume"], 70);

    let (status, _) = call_json(&app, Method::GET, "/api/users/9/preferences", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call_json(&app, Method::PUT, "/api/preferences/1", Some(json!({"brightness": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, prefs) = call_json(
        &app,
        Method::PUT,
        "/api/preferences/1",
        Some(json!({"volume": 30, "voiceEnabled": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["volume"], 30);
    assert_eq!(prefs["voiceEnabled"], false);
    assert_eq!(prefs["brightness"], 60);

    let (status, _) = call_json(&app, Method::PUT, "/api/preferences/7", Some(json!({"volume": 30}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_validation() {
    let app = app();
    let (status, body) =
        call_json(&app, Method::POST, "/api/ai/chat", Some(json!({"sessionId": "s1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid message");

    let (status, body) =
        call_json(&app, Method::POST, "/api/ai/chat", Some(json!({"message": "hello"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid session ID");

    let (status, _) =
        call_json(&app, Method::POST, "/api/ai/chat", Some(json!({"message": 3, "sessionId": "s1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_suggests_and_records() {
    let app = app();
    let (status, reply) = call_json(
        &app,
        Method::POST,
        "/api/ai/chat",
        Some(json!({"message": "I'm stressed but also happy", "sessionId": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        reply["message"],
        "Based on what you've shared, I think you might benefit from our Stressed or Happy experience."
    );
    assert_eq!(reply["suggestedMoods"][0]["name"], "Stressed");
    assert_eq!(reply["suggestedMoods"][1]["name"], "Happy");

    let (_, reply) = call_json(
        &app,
        Method::POST,
        "/api/ai/chat",
        Some(json!({"message": "just feeling okay", "sessionId": "abc", "userId": 3})),
    )
    .await;
    assert_eq!(reply["suggestedMoods"][0]["name"], "Calm");
    assert_eq!(reply["suggestedMoods"][1]["name"], "Chill");

    let (status, history) = call_json(&app, Method::GET, "/api/ai/conversations/abc", None).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["suggestedMood"], "Stressed");
    assert_eq!(history[1]["userId"], 3);
    let stored: Value = serde_json::from_str(history[0]["aiResponse"].as_str().unwrap()).unwrap();
    assert_eq!(stored["suggestedMoods"][1]["name"], "Happy");
}

#[tokio::test]
async fn test_rules_endpoint() {
    let (status, rules) = call_json(&app(), Method::GET, "/api/ai/rules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rules["version"], RULE_TABLE_VERSION);
    assert_eq!(rules["rules"].as_array().map(Vec::len), Some(8));
    assert_eq!(rules["defaults"], json!(["Calm", "Chill"]));
}

#[tokio::test]
async fn test_pages() {
    let app = app();
    let (status, html) = call(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("/experience/stressed"));

    let (status, html) = call(&app, Method::GET, "/experience/calm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("const MOOD = \"Calm\";"));

    let (status, html) = call(&app, Method::GET, "/experience/grumpy", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Invalid Mood"));
}

#[tokio::test]
async fn test_cli_chat_against_live_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app()).await;
    });

    let backend = HttpChatBackend::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let assistant = ChatAssistant::new(backend);
    let outcome = assistant
        .ask(&ChatRequest::new("I feel very tired and exhausted", "cli"))
        .await
        .unwrap();
    assert_eq!(outcome.source, ReplySource::Remote);
    assert_eq!(outcome.reply.moods().first(), Some(&Mood::Tired));
}
