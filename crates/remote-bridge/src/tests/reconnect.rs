//! Dropped streams, fatal stream events and record writes.

use super::harness::{
    control_event, listener, now_ms, put_event, CannedResponse, FakeDatabase, RecordingHost,
    SECRET,
};
use crate::error::BridgeError;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

/// An unreachable or unauthorized database fails the first connect.
#[tokio::test]
async fn first_connect_failure_is_reported() {
    let db = FakeDatabase::start(vec![CannedResponse::Status(
        401,
        r#"{"error":"Permission denied"}"#.to_string(),
    )])
    .await;
    let host = RecordingHost::new();
    let listener = listener(&db, &host, Duration::ZERO);

    match listener.connect().await {
        Err(BridgeError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Permission denied"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("connect should fail"),
    }
}

/// Closed streams and failed reopen attempts are retried; cancel ends the run.
#[tokio::test]
async fn reopens_dropped_stream_until_cancelled() {
    let db = FakeDatabase::start(vec![
        CannedResponse::Stream(vec![put_event(
            "/",
            json!({ "action": "play", "timestamp": now_ms() }),
        )]),
        CannedResponse::Status(503, "unavailable".to_string()),
        CannedResponse::Stream(vec![put_event(
            "/",
            json!({ "action": "next", "timestamp": now_ms() }),
        )]),
        CannedResponse::Stream(vec![control_event("cancel", "\"Permission denied\"")]),
    ])
    .await;
    let host = RecordingHost::new();
    let mut listener = listener(&db, &host, Duration::ZERO);

    let stream = listener.connect().await.unwrap();
    let result = timeout(Duration::from_secs(5), listener.run(stream))
        .await
        .expect("listener should stop on cancel");

    match result {
        Err(BridgeError::Cancelled(reason)) => assert_eq!(reason, "Permission denied"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(host.calls(), vec!["play_pause", "next_track"]);
    assert_eq!(db.requests().len(), 4);
}

/// A half-open stream is abandoned after the idle timeout and reopened.
#[tokio::test]
async fn silent_stream_is_reopened() {
    let db = FakeDatabase::start(vec![
        CannedResponse::Silent,
        CannedResponse::Stream(vec![
            put_event("/", json!({ "action": "previous", "timestamp": now_ms() })),
            control_event("cancel", "\"Permission denied\""),
        ]),
    ])
    .await;
    let host = RecordingHost::new();
    let mut listener = listener(&db, &host, Duration::ZERO);

    let stream = listener.connect().await.unwrap();
    let result = timeout(Duration::from_secs(5), listener.run(stream))
        .await
        .expect("listener should reconnect after going idle");

    assert!(matches!(result, Err(BridgeError::Cancelled(_))));
    assert_eq!(host.calls(), vec!["previous_track"]);
    assert_eq!(db.requests().len(), 2);
}

/// The record replayed after a reconnect is de-duplicated by the interval.
#[tokio::test]
async fn replay_after_reconnect_runs_once() {
    let record = json!({ "action": "mute", "timestamp": now_ms() });
    let db = FakeDatabase::start(vec![
        CannedResponse::Stream(vec![put_event("/", record.clone())]),
        CannedResponse::Stream(vec![put_event("/", record)]),
        CannedResponse::Stream(vec![control_event("auth_revoked", "\"token expired\"")]),
    ])
    .await;
    let host = RecordingHost::new();
    let mut listener = listener(&db, &host, Duration::from_secs(30));

    let stream = listener.connect().await.unwrap();
    let result = timeout(Duration::from_secs(5), listener.run(stream))
        .await
        .expect("listener should stop on auth_revoked");

    assert!(matches!(result, Err(BridgeError::AuthRevoked)));
    assert_eq!(host.calls(), vec!["toggle_mute"]);
}

/// `put` writes the record as JSON to the node.
#[tokio::test]
async fn put_writes_record_to_node() {
    let db = FakeDatabase::start(vec![CannedResponse::Status(200, "{}".to_string())]).await;
    let record = json!({ "action": "custom", "command": "echo hi", "timestamp": 1 });

    db.client().put("/media/", &record).await.unwrap();

    let requests = db.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with(&format!("PUT /media.json?auth={SECRET} HTTP/1.1")));

    let body = requests[0].split("\r\n\r\n").nth(1).unwrap();
    let written: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(written, record);
}

/// Rejected writes surface the database status.
#[tokio::test]
async fn rejected_put_is_an_error() {
    let db = FakeDatabase::start(vec![CannedResponse::Status(
        403,
        r#"{"error":"Permission denied"}"#.to_string(),
    )])
    .await;

    let err = db
        .client()
        .put("media", &json!({ "action": "play" }))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Status { status: 403, .. }));
}
