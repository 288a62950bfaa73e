// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use serenity_core::ExperienceConfig;
use serenity_server::{router, AppState};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect() -> Socket {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(AppState::new(ExperienceConfig::default(), Some(7)))).await;
    });
    let (ws, _) = connect_async(format!("ws://{addr}/ws/experience")).await.unwrap();
    ws
}

async fn send(ws: &mut Socket, msg: Value) {
    ws.send(Message::text(msg.to_string())).await.unwrap();
}

async fn next_json(ws: &mut Socket) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("no message within 5s")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Skip messages until one of type `ty` arrives.
async fn next_of(ws: &mut Socket, ty: &str) -> Value {
    loop {
        let msg = next_json(ws).await;
        if msg["type"] == ty {
            return msg;
        }
    }
}

#[tokio::test]
async fn test_ready_handshake_reports_idle() {
    let mut ws = connect().await;
    send(&mut ws, json!({"type": "Ready"})).await;
    let state = next_json(&mut ws).await;
    assert_eq!(state, json!({"type": "State", "state": "Idle", "mood": null}));
}

#[tokio::test]
async fn test_bad_input_reports_errors() {
    let mut ws = connect().await;
    send(&mut ws, json!({"type": "Ready"})).await;
    next_of(&mut ws, "State").await;

    send(&mut ws, json!({"type": "SelectMood", "mood": "Grumpy"})).await;
    let err = next_of(&mut ws, "Error").await;
    assert!(err["message"].as_str().unwrap().contains("Grumpy"));

    send(&mut ws, json!({"type": "Explode"})).await;
    let err = next_of(&mut ws, "Error").await;
    assert!(err["message"].as_str().unwrap().starts_with("Invalid message"));

    send(&mut ws, json!({"type": "SaveFavorite"})).await;
    let err = next_of(&mut ws, "Error").await;
    assert_eq!(err["message"], "No mood selected");
}

#[tokio::test]
async fn test_mood_switch_never_sends_frames_of_old_scene() {
    let mut ws = connect().await;
    send(&mut ws, json!({"type": "Ready"})).await;
    next_of(&mut ws, "State").await;

    send(&mut ws, json!({"type": "SelectMood", "mood": "calm"})).await;
    let calm = next_of(&mut ws, "SceneInit").await;
    assert_eq!(calm["mood"]["name"], "Calm");
    send(&mut ws, json!({"type": "AudioLoaded", "track": "background"})).await;

    let mut calm_frames = 0;
    while calm_frames < 5 {
        let frame = next_of(&mut ws, "Frame").await;
        assert_eq!(frame["generation"], calm["generation"]);
        calm_frames += 1;
    }

    send(&mut ws, json!({"type": "SelectMood", "mood": "Tired"})).await;
    let tired = loop {
        let msg = next_json(&mut ws).await;
        match msg["type"].as_str() {
            Some("SceneInit") => break msg,
            Some("Frame") => assert_eq!(msg["generation"], calm["generation"]),
            _ => {}
        }
    };
    assert_ne!(tired["generation"], calm["generation"]);
    let tired_len = tired["positions"].as_array().map(Vec::len);
    send(&mut ws, json!({"type": "AudioLoaded", "track": "background"})).await;

    let mut tired_frames = 0;
    while tired_frames < 10 {
        let msg = next_json(&mut ws).await;
        if msg["type"] != "Frame" {
            continue;
        }
        assert_eq!(msg["generation"], tired["generation"]);
        if let Some(positions) = msg["positions"].as_array() {
            assert_eq!(Some(positions.len()), tired_len);
        }
        tired_frames += 1;
    }

    ws.close(None).await.unwrap();
}
