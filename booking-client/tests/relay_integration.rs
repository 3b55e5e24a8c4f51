//! Relay client integration tests: framing over TCP loopback, memory
//! transport fan-out, and connection-manager idempotence.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use booking_client::{ConnectionState, RelayClient, RelayConnection};
use shared::relay::{EventKind, NotificationPayload, RelayMessage, ReservationEventPayload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

fn notification(title: &str) -> NotificationPayload {
    NotificationPayload {
        id: 1,
        kind: 0,
        title: title.to_string(),
        message: "hello".to_string(),
        payload: None,
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn test_memory_transport_delivers_events() {
    let (relay_tx, _) = broadcast::channel(16);
    let (client_tx, _client_rx) = broadcast::channel(16);

    let client = RelayClient::memory(&relay_tx, &client_tx);
    let mut sub = client.subscribe();

    let payload = ReservationEventPayload {
        id: "res-7".to_string(),
        customer_name: "Hoang Thi E".to_string(),
        phone_number: "0987654321".to_string(),
        number_of_people: 3,
    };
    relay_tx
        .send(RelayMessage::reservation_created(&payload))
        .unwrap();

    let msg = timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("timed out")
        .unwrap();
    assert_eq!(msg.kind, EventKind::ReservationCreated);
    let parsed: ReservationEventPayload = msg.parse_payload().unwrap();
    assert_eq!(parsed.id, "res-7");
}

#[tokio::test]
async fn test_tcp_frame_roundtrip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Server side: read the handshake frame, then push one notification
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Handshake: kind + uuid + len + payload
        let mut kind = [0u8; 1];
        socket.read_exact(&mut kind).await.unwrap();
        assert_eq!(kind[0], EventKind::Handshake as u8);
        let mut uuid_buf = [0u8; 16];
        socket.read_exact(&mut uuid_buf).await.unwrap();
        let mut len_buf = [0u8; 4];
        socket.read_exact(&mut len_buf).await.unwrap();
        let mut payload = vec![0u8; u32::from_le_bytes(len_buf) as usize];
        socket.read_exact(&mut payload).await.unwrap();

        // Give the client time to subscribe before the push goes out
        tokio::time::sleep(Duration::from_millis(100)).await;

        let msg = RelayMessage::notification(&notification("Front desk"));
        let mut frame = Vec::new();
        frame.push(msg.kind as u8);
        frame.extend_from_slice(msg.request_id.as_bytes());
        frame.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&msg.payload);
        socket.write_all(&frame).await.unwrap();

        // Keep the socket open until the client is done
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let client = RelayClient::connect(&addr.to_string(), "test-console")
        .await
        .unwrap();
    let mut sub = client.subscribe();

    let msg = timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("timed out")
        .unwrap();
    assert_eq!(msg.kind, EventKind::Notification);
    let parsed: NotificationPayload = msg.parse_payload().unwrap();
    assert_eq!(parsed.title, "Front desk");
}

#[tokio::test]
async fn test_connection_manager_dials_once() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let accepted_clone = accepted.clone();
    tokio::spawn(async move {
        loop {
            let (socket, _) = listener.accept().await.unwrap();
            accepted_clone.fetch_add(1, Ordering::SeqCst);
            // Park the socket so the connection stays up
            tokio::spawn(async move {
                let mut socket = socket;
                let mut buf = [0u8; 64];
                while socket.read(&mut buf).await.unwrap_or(0) > 0 {}
            });
        }
    });

    let conn = Arc::new(RelayConnection::new(addr.to_string(), "test-console"));

    let (a, b) = tokio::join!(conn.ensure_connected(), conn.ensure_connected());
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(conn.state().await, ConnectionState::Connected);

    // A third call reuses the live connection
    conn.ensure_connected().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), 1);

    conn.disconnect().await;
    assert_eq!(conn.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connection_failure_returns_to_disconnected() {
    // Nothing listens here; the dial must fail and leave state Disconnected
    let conn = RelayConnection::new("127.0.0.1:1", "test-console");
    assert!(conn.ensure_connected().await.is_err());
    assert_eq!(conn.state().await, ConnectionState::Disconnected);
}
