//! Unit tests for `WsFanout`.
//!
//! These tests exercise the WebSocket fanout directly, without
//! performing any HTTP upgrades. They verify connect/disconnect
//! semantics, the per-subscriber state machine, channel-scoped
//! broadcast delivery, self-healing membership, and graceful shutdown.

use axum::extract::ws::Message;
use liftguard_api::ws::{Channel, WsFanout};

// ---------------------------------------------------------------------------
// Test: new fanout starts with zero connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_fanout_has_zero_connections() {
    let fanout = WsFanout::new();

    assert_eq!(fanout.connection_count().await, 0);
    assert_eq!(fanout.member_count(Channel::Events).await, 0);
}

// ---------------------------------------------------------------------------
// Test: connect() registers the subscriber on its channel only
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_registers_on_one_channel() {
    let fanout = WsFanout::new();

    let _rx = fanout.connect("conn-1".to_string(), Channel::Events).await;

    assert_eq!(fanout.connection_count().await, 1);
    assert_eq!(fanout.member_count(Channel::Events).await, 1);
    assert_eq!(fanout.member_count(Channel::Telemetry).await, 0);
}

// ---------------------------------------------------------------------------
// Test: disconnect() removes the subscriber
// ---------------------------------------------------------------------------

#[tokio::test]
async fn disconnect_removes_subscriber() {
    let fanout = WsFanout::new();

    let _rx = fanout.connect("conn-1".to_string(), Channel::Events).await;
    assert_eq!(fanout.member_count(Channel::Events).await, 1);

    fanout.disconnect("conn-1").await;
    assert_eq!(fanout.member_count(Channel::Events).await, 0);
}

// ---------------------------------------------------------------------------
// Test: disconnect() of an unknown subscriber is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn disconnect_unknown_subscriber_is_noop() {
    let fanout = WsFanout::new();

    let _rx = fanout.connect("conn-1".to_string(), Channel::Events).await;
    fanout.disconnect("nonexistent").await;

    assert_eq!(fanout.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: broadcast() reaches only Connected members of the channel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_reaches_connected_members_of_channel() {
    let fanout = WsFanout::new();

    let mut rx1 = fanout.connect("conn-1".to_string(), Channel::Events).await;
    let mut rx2 = fanout.connect("conn-2".to_string(), Channel::Events).await;
    let mut rx3 = fanout
        .connect("conn-3".to_string(), Channel::Telemetry)
        .await;
    for conn_id in ["conn-1", "conn-2", "conn-3"] {
        fanout.mark_connected(conn_id).await;
    }

    fanout
        .broadcast(Channel::Events, Message::Text("hello everyone".into()))
        .await;

    let msg1 = rx1.recv().await.expect("rx1 should receive broadcast");
    let msg2 = rx2.recv().await.expect("rx2 should receive broadcast");
    assert!(matches!(&msg1, Message::Text(t) if *t == "hello everyone"));
    assert!(matches!(&msg2, Message::Text(t) if *t == "hello everyone"));

    // The telemetry subscriber must not see events-channel traffic.
    assert!(rx3.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: Connecting subscribers do not receive broadcasts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connecting_subscriber_receives_nothing() {
    let fanout = WsFanout::new();

    let mut rx = fanout.connect("conn-1".to_string(), Channel::Events).await;

    fanout
        .broadcast(Channel::Events, Message::Text("too early".into()))
        .await;
    assert!(rx.try_recv().is_err());

    fanout.mark_connected("conn-1").await;
    fanout
        .broadcast(Channel::Events, Message::Text("on time".into()))
        .await;

    let msg = rx.recv().await.expect("connected subscriber should receive");
    assert!(matches!(&msg, Message::Text(t) if *t == "on time"));
}

// ---------------------------------------------------------------------------
// Test: broadcast() to an empty channel is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_to_empty_channel_is_noop() {
    let fanout = WsFanout::new();

    // Must not panic or error.
    fanout
        .broadcast(Channel::Events, Message::Text("anyone?".into()))
        .await;

    assert_eq!(fanout.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: failed delivery removes the subscriber (self-healing)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_delivery_removes_subscriber() {
    let fanout = WsFanout::new();

    let rx1 = fanout.connect("conn-1".to_string(), Channel::Events).await;
    let mut rx2 = fanout.connect("conn-2".to_string(), Channel::Events).await;
    fanout.mark_connected("conn-1").await;
    fanout.mark_connected("conn-2").await;

    // Drop rx1 to close its delivery queue.
    drop(rx1);

    fanout
        .broadcast(Channel::Events, Message::Text("still alive".into()))
        .await;

    // conn-2 still receives; conn-1 is silently forgotten.
    let msg = rx2.recv().await.expect("rx2 should receive broadcast");
    assert!(matches!(&msg, Message::Text(t) if *t == "still alive"));
    assert_eq!(fanout.member_count(Channel::Events).await, 1);
}

// ---------------------------------------------------------------------------
// Test: send_to() targets a single subscriber
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_to_targets_one_subscriber() {
    let fanout = WsFanout::new();

    let mut rx1 = fanout.connect("conn-1".to_string(), Channel::Events).await;
    let mut rx2 = fanout.connect("conn-2".to_string(), Channel::Events).await;
    fanout.mark_connected("conn-1").await;
    fanout.mark_connected("conn-2").await;

    let delivered = fanout
        .send_to("conn-1", Message::Text(r#"{"type":"pong"}"#.into()))
        .await;
    assert!(delivered);

    let msg = rx1.recv().await.expect("rx1 should receive personal message");
    assert!(matches!(&msg, Message::Text(t) if *t == r#"{"type":"pong"}"#));
    assert!(rx2.try_recv().is_err());

    assert!(!fanout.send_to("nonexistent", Message::Text("x".into())).await);
}

// ---------------------------------------------------------------------------
// Test: shutdown_all() sends Close and clears all subscribers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let fanout = WsFanout::new();

    let mut rx1 = fanout.connect("conn-1".to_string(), Channel::Events).await;
    let mut rx2 = fanout
        .connect("conn-2".to_string(), Channel::Telemetry)
        .await;
    fanout.mark_connected("conn-1").await;
    fanout.mark_connected("conn-2").await;
    assert_eq!(fanout.connection_count().await, 2);

    fanout.shutdown_all().await;

    assert_eq!(fanout.connection_count().await, 0);

    let msg1 = rx1.recv().await.expect("rx1 should receive Close");
    assert!(
        matches!(msg1, Message::Close(None)),
        "Expected Close(None), got: {msg1:?}"
    );

    let msg2 = rx2.recv().await.expect("rx2 should receive Close");
    assert!(
        matches!(msg2, Message::Close(None)),
        "Expected Close(None), got: {msg2:?}"
    );

    // After Close, the queue should be closed (no more messages).
    assert!(
        rx1.recv().await.is_none(),
        "Queue should be closed after shutdown"
    );
}

// ---------------------------------------------------------------------------
// Test: adding with duplicate ID replaces the previous subscriber
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_id_replaces_previous_subscriber() {
    let fanout = WsFanout::new();

    let _rx_old = fanout.connect("conn-1".to_string(), Channel::Events).await;
    assert_eq!(fanout.connection_count().await, 1);

    // Re-add with the same ID -- should replace, not duplicate.
    let mut rx_new = fanout.connect("conn-1".to_string(), Channel::Events).await;
    fanout.mark_connected("conn-1").await;
    assert_eq!(fanout.connection_count().await, 1);

    fanout
        .broadcast(Channel::Events, Message::Text("replaced".into()))
        .await;
    let msg = rx_new.recv().await.expect("New rx should receive message");
    assert!(matches!(&msg, Message::Text(t) if *t == "replaced"));
}
