//! End-to-end tests against an in-process WebSocket echo server

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use parley_client::{ChatEvent, Connection, Delivery, InboundOutcome, Session, TranscriptStore};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Start an echo server on an ephemeral port; echoes text frames back on
/// every accepted connection
async fn spawn_echo_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let ws = match tokio_tungstenite::accept_async(stream).await {
                    Ok(ws) => ws,
                    Err(_) => return,
                };
                let (mut sink, mut source) = ws.split();
                while let Some(Ok(frame)) = source.next().await {
                    if let Message::Text(text) = frame {
                        if sink.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                }
            });
        }
    });

    format!("ws://{}", addr)
}

/// Server that accepts one connection and immediately drops it
async fn spawn_slamming_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            if let Ok(ws) = tokio_tungstenite::accept_async(stream).await {
                drop(ws);
            }
        }
    });

    format!("ws://{}", addr)
}

/// Server that reports whether the client closed the stream gracefully
async fn spawn_close_observing_server() -> (String, tokio::sync::oneshot::Receiver<bool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            if let Ok(ws) = tokio_tungstenite::accept_async(stream).await {
                let (_sink, mut source) = ws.split();
                let mut got_close = false;
                while let Some(Ok(frame)) = source.next().await {
                    if matches!(frame, Message::Close(_)) {
                        got_close = true;
                        break;
                    }
                }
                let _ = done_tx.send(got_close);
            }
        }
    });

    (format!("ws://{}", addr), done_rx)
}

async fn next_event(conn: &mut Connection) -> ChatEvent {
    timeout(RECV_TIMEOUT, conn.recv())
        .await
        .expect("timed out waiting for event")
        .expect("connection event stream ended")
}

#[tokio::test]
async fn test_send_echo_confirm_persists_one_record() {
    let endpoint = spawn_echo_server().await;
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(
        "Ann",
        TranscriptStore::new(dir.path().join("transcript.json")),
    );
    let mut conn = Connection::new(endpoint);
    conn.connect().await.unwrap();
    assert!(conn.is_connected());

    // Optimistic send: pending placeholder visible before any echo
    let message = session.send("hi");
    assert!(session.feed()[0].is_pending());
    assert!(session.store().load_all().is_empty());

    conn.send_text(message.to_wire().unwrap()).await.unwrap();

    // Echo arrives and confirms the pending entry
    let raw = match next_event(&mut conn).await {
        ChatEvent::Message(raw) => raw,
        other => panic!("expected message, got {:?}", other),
    };
    let outcome = session.handle_inbound(&raw);
    assert!(matches!(outcome, InboundOutcome::Confirmed { index: 0 }));

    // Exactly one transcript record, no duplicate from the optimistic render
    let records = session.store().load_all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user, "Ann");
    assert_eq!(records[0].text, "hi");
    assert_eq!(records[0].id, message.id);

    conn.disconnect().await;
}

#[tokio::test]
async fn test_plain_text_echo_is_wrapped_incoming() {
    let endpoint = spawn_echo_server().await;
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(
        "Ann",
        TranscriptStore::new(dir.path().join("transcript.json")),
    );
    let mut conn = Connection::new(endpoint);
    conn.connect().await.unwrap();

    // Raw non-record frame, as a plain-text server would send
    conn.send_text("howdy".into()).await.unwrap();

    let raw = match next_event(&mut conn).await {
        ChatEvent::Message(raw) => raw,
        other => panic!("expected message, got {:?}", other),
    };
    let outcome = session.handle_inbound(&raw);
    assert!(matches!(outcome, InboundOutcome::Incoming { .. }));
    assert_eq!(session.feed()[0].message.user, "Remote");
    assert_eq!(session.feed()[0].message.text, "howdy");

    conn.disconnect().await;
}

#[tokio::test]
async fn test_remote_close_fails_pending_sends() {
    let endpoint = spawn_slamming_server().await;
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(
        "Ann",
        TranscriptStore::new(dir.path().join("transcript.json")),
    );
    let mut conn = Connection::new(endpoint);
    conn.connect().await.unwrap();

    let _message = session.send("doomed");
    assert_eq!(session.pending_count(), 1);

    // Server drops the connection; the pending send is marked failed
    let event = next_event(&mut conn).await;
    assert_eq!(event, ChatEvent::Closed);
    conn.mark_closed();

    let failed = session.handle_disconnect();
    assert_eq!(failed, 1);
    assert_eq!(session.feed()[0].delivery, Delivery::Failed);
    // Never persisted
    assert!(session.store().load_all().is_empty());
}

#[tokio::test]
async fn test_disconnect_closes_stream_gracefully() {
    let (endpoint, observed) = spawn_close_observing_server().await;

    let mut conn = Connection::new(endpoint);
    conn.connect().await.unwrap();
    conn.disconnect().await;

    // The server sees a Close frame, not a dropped TCP stream
    let got_close = timeout(RECV_TIMEOUT, observed)
        .await
        .expect("timed out waiting for server")
        .expect("server task ended without reporting");
    assert!(got_close);
}

#[tokio::test]
async fn test_two_sends_interleaved_with_foreign_message() {
    let endpoint = spawn_echo_server().await;
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(
        "Ann",
        TranscriptStore::new(dir.path().join("transcript.json")),
    );
    let mut conn = Connection::new(endpoint);
    conn.connect().await.unwrap();

    let first = session.send("first");
    let second = session.send("second");
    conn.send_text(first.to_wire().unwrap()).await.unwrap();
    // A foreign record (unknown id) slips in between the echoes
    conn.send_text(r#"{"id":"foreign-1","user":"Bob","text":"yo","time":9}"#.into())
        .await
        .unwrap();
    conn.send_text(second.to_wire().unwrap()).await.unwrap();

    for _ in 0..3 {
        let raw = match next_event(&mut conn).await {
            ChatEvent::Message(raw) => raw,
            other => panic!("expected message, got {:?}", other),
        };
        session.handle_inbound(&raw);
    }

    assert_eq!(session.pending_count(), 0);
    // Two confirmed sends plus one incoming
    let records = session.store().load_all();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].text, "first");
    assert_eq!(records[1].user, "Bob");
    assert_eq!(records[2].text, "second");

    conn.disconnect().await;
}
