//! Integration tests for the per-river retry discipline.
//!
//! Uses `start_paused` so tokio auto-advances the clock whenever every task
//! is idle. A 200 ms attempt timeout then elapses instantly and the tests
//! stay deterministic.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bridgefire_protocol::RiverId;
use bridgefire_transport::{
    Datagram, MemoryDatagram, RetryPolicy, RiverChannel, TransportError,
};
use tokio::sync::{mpsc, Mutex};

// =========================================================================
// Helpers
// =========================================================================

/// A datagram that stays silent until its `answer_on`-th send.
struct Flaky {
    answer_on: Option<u32>,
    sends: Arc<AtomicU32>,
    replies_tx: mpsc::UnboundedSender<Vec<u8>>,
    replies_rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl Flaky {
    fn new(answer_on: Option<u32>) -> (Self, Arc<AtomicU32>) {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        let sends = Arc::new(AtomicU32::new(0));
        let flaky = Self {
            answer_on,
            sends: Arc::clone(&sends),
            replies_tx,
            replies_rx: Mutex::new(replies_rx),
        };
        (flaky, sends)
    }
}

impl Datagram for Flaky {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        let n = self.sends.fetch_add(1, Ordering::SeqCst) + 1;
        if Some(n) == self.answer_on {
            let mut reply = b"reply to ".to_vec();
            reply.extend_from_slice(data);
            let _ = self.replies_tx.send(reply);
        }
        Ok(())
    }

    async fn recv(&self) -> Result<Vec<u8>, TransportError> {
        self.replies_rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| TransportError::Closed("test".into()))
    }
}

/// A datagram whose peer is unreachable.
struct Unreachable {
    sends: Arc<AtomicU32>,
}

impl Datagram for Unreachable {
    async fn send(&self, _data: &[u8]) -> Result<(), TransportError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn recv(&self) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::ReceiveFailed(std::io::Error::from(
            std::io::ErrorKind::ConnectionRefused,
        )))
    }
}

fn river(i: usize) -> RiverId {
    RiverId::new(i).unwrap()
}

// =========================================================================
// request()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_reply_on_first_attempt() {
    let (flaky, sends) = Flaky::new(Some(1));
    let mut ch = RiverChannel::new(river(0), flaky, RetryPolicy::default());

    let reply = ch.request(b"hello").await.unwrap();
    assert_eq!(reply, b"reply to hello");
    assert_eq!(sends.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reply_on_fourth_attempt() {
    let (flaky, sends) = Flaky::new(Some(4));
    let mut ch = RiverChannel::new(river(1), flaky, RetryPolicy::default());

    let start = tokio::time::Instant::now();
    let reply = ch.request(b"getturn").await.unwrap();

    assert_eq!(reply, b"reply to getturn");
    assert_eq!(sends.load(Ordering::SeqCst), 4);
    // Three full timeouts passed before the fourth send was answered.
    assert_eq!(start.elapsed(), Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn test_reply_on_last_attempt() {
    let (flaky, sends) = Flaky::new(Some(11));
    let mut ch = RiverChannel::new(river(2), flaky, RetryPolicy::default());

    assert!(ch.request(b"x").await.is_ok());
    assert_eq!(sends.load(Ordering::SeqCst), 11);
}

#[tokio::test(start_paused = true)]
async fn test_all_attempts_time_out() {
    let (flaky, sends) = Flaky::new(None);
    let mut ch = RiverChannel::new(river(3), flaky, RetryPolicy::default());

    let err = ch.request(b"x").await.unwrap_err();
    assert!(matches!(
        err,
        TransportError::TimeoutExceeded {
            river: r,
            attempts: 11,
        } if r == river(3)
    ));
    assert!(err.is_timeout());
    assert_eq!(sends.load(Ordering::SeqCst), 11);
}

#[tokio::test(start_paused = true)]
async fn test_custom_policy_limits_attempts() {
    let (flaky, sends) = Flaky::new(None);
    let policy = RetryPolicy {
        attempt_timeout: Duration::from_millis(50),
        max_retransmissions: 2,
    };
    let mut ch = RiverChannel::new(river(0), flaky, policy);

    let start = tokio::time::Instant::now();
    let err = ch.request(b"x").await.unwrap_err();
    assert!(matches!(err, TransportError::TimeoutExceeded { attempts: 3, .. }));
    assert_eq!(sends.load(Ordering::SeqCst), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(150));
}

#[tokio::test(start_paused = true)]
async fn test_non_timeout_error_is_not_retried() {
    let sends = Arc::new(AtomicU32::new(0));
    let dgram = Unreachable {
        sends: Arc::clone(&sends),
    };
    let mut ch = RiverChannel::new(river(0), dgram, RetryPolicy::default());

    let err = ch.request(b"x").await.unwrap_err();
    assert!(matches!(err, TransportError::ReceiveFailed(_)));
    assert_eq!(sends.load(Ordering::SeqCst), 1);
}

// =========================================================================
// send() / recv_within()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_recv_within_returns_none_on_silence() {
    let (client, _server) = MemoryDatagram::pair();
    let mut ch = RiverChannel::new(river(0), client, RetryPolicy::default());
    assert!(ch.recv_within().await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_send_then_collect_several_replies() {
    let (client, server) = MemoryDatagram::pair();
    let mut ch = RiverChannel::new(river(1), client, RetryPolicy::default());

    ch.send(b"getturn").await.unwrap();
    assert_eq!(server.recv().await.unwrap(), b"getturn");
    server.send(b"one").await.unwrap();
    server.send(b"two").await.unwrap();

    assert_eq!(ch.recv_within().await.unwrap().unwrap(), b"one");
    assert_eq!(ch.recv_within().await.unwrap().unwrap(), b"two");
    assert!(ch.recv_within().await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_recv_within_reports_closed_peer() {
    let (client, server) = MemoryDatagram::pair();
    drop(server);
    let mut ch = RiverChannel::new(river(0), client, RetryPolicy::default());
    assert!(matches!(ch.recv_within().await, Err(TransportError::Closed(_))));
}

// =========================================================================
// Stale replies
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_drain_discards_queued_datagrams() {
    let (client, server) = MemoryDatagram::pair();
    let mut ch = RiverChannel::new(river(0), client, RetryPolicy::default());

    for stale in [&b"one"[..], b"two", b"three"] {
        server.send(stale).await.unwrap();
    }
    assert_eq!(ch.drain().await, 3);
    assert_eq!(ch.drain().await, 0);
    assert!(ch.recv_within().await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_late_reply_is_not_taken_by_next_request() {
    let (client, server) = MemoryDatagram::pair();
    let mut ch = RiverChannel::new(river(0), client, RetryPolicy::default());

    let peer = tokio::spawn(async move {
        // First attempt answered too late, then the resend answered at once.
        assert_eq!(server.recv().await.unwrap(), b"authreq");
        tokio::time::sleep(Duration::from_millis(250)).await;
        server.send(b"authresp").await.unwrap();
        assert_eq!(server.recv().await.unwrap(), b"authreq");
        server.send(b"authresp").await.unwrap();

        assert_eq!(server.recv().await.unwrap(), b"getcannons");
        server.send(b"cannons").await.unwrap();
    });

    assert_eq!(ch.request(b"authreq").await.unwrap(), b"authresp");
    assert_eq!(ch.request(b"getcannons").await.unwrap(), b"cannons");
    peer.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_request_matching_skips_rejected_replies() {
    let (client, server) = MemoryDatagram::pair();
    let mut ch = RiverChannel::new(river(2), client, RetryPolicy::default());

    let peer = tokio::spawn(async move {
        assert_eq!(server.recv().await.unwrap(), b"getcannons");
        server.send(b"authresp").await.unwrap();
        server.send(b"cannons").await.unwrap();
        server
    });

    let reply = ch
        .request_matching(b"getcannons", |d| d.starts_with(b"cannons"))
        .await
        .unwrap();
    assert_eq!(reply, b"cannons");

    let server = peer.await.unwrap();
    assert!(ch.recv_within().await.unwrap().is_none());
    drop(server);
}

#[tokio::test(start_paused = true)]
async fn test_request_matching_times_out_on_unwanted_replies() {
    let (client, server) = MemoryDatagram::pair();
    let policy = RetryPolicy {
        attempt_timeout: Duration::from_millis(50),
        max_retransmissions: 1,
    };
    let mut ch = RiverChannel::new(river(3), client, policy);

    let peer = tokio::spawn(async move {
        while let Ok(request) = server.recv().await {
            if server.send(b"wrong").await.is_err() {
                break;
            }
            assert_eq!(request, b"getcannons");
        }
    });

    let err = ch
        .request_matching(b"getcannons", |d| d == b"right")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::TimeoutExceeded { attempts: 2, .. }));
    drop(ch);
    peer.await.unwrap();
}
