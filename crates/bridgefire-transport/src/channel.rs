//! Per-river request/reply with bounded retransmission.

use std::time::Duration;

use bridgefire_protocol::RiverId;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

use crate::{Datagram, TransportError};

/// How long to wait for each reply and how often to resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait per attempt before the request is sent again.
    pub attempt_timeout: Duration,
    /// Resends after the first attempt. `10` means 11 attempts in total.
    pub max_retransmissions: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(200),
            max_retransmissions: 10,
        }
    }
}

impl RetryPolicy {
    /// Total number of sends a single request may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retransmissions.saturating_add(1)
    }
}

/// One river's endpoint.
///
/// Every method takes `&mut self`: a river never has two requests in
/// flight, and the borrow checker holds the orchestrator to that.
pub struct RiverChannel<D: Datagram> {
    river: RiverId,
    datagram: D,
    policy: RetryPolicy,
}

impl<D: Datagram> RiverChannel<D> {
    pub fn new(river: RiverId, datagram: D, policy: RetryPolicy) -> Self {
        Self {
            river,
            datagram,
            policy,
        }
    }

    pub fn river(&self) -> RiverId {
        self.river
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Sends `message` once without waiting for anything back.
    pub async fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        trace!(river = %self.river, len = message.len(), "send");
        self.datagram.send(message).await
    }

    /// Waits one attempt timeout for the next datagram.
    ///
    /// Returns `Ok(None)` if nothing arrived in time. Transport failures
    /// are returned as errors straight away.
    pub async fn recv_within(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match time::timeout(self.policy.attempt_timeout, self.datagram.recv()).await {
            Ok(Ok(data)) => {
                trace!(river = %self.river, len = data.len(), "recv");
                Ok(Some(data))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Ok(None),
        }
    }

    /// Throws away every datagram already waiting on the channel.
    ///
    /// Replies that showed up after their attempt timed out would otherwise
    /// be read as the answer to the next request. Returns how many were
    /// dropped. Receive errors are left for the next real read to report.
    pub async fn drain(&mut self) -> usize {
        let mut stale = 0;
        while let Ok(Ok(data)) = time::timeout(Duration::ZERO, self.datagram.recv()).await {
            stale += 1;
            debug!(river = %self.river, len = data.len(), "discarding stale datagram");
        }
        stale
    }

    /// Sends `message` and returns the first reply.
    ///
    /// Same as [`request_matching`](Self::request_matching) with every
    /// reply accepted.
    ///
    /// # Errors
    /// `TransportError::TimeoutExceeded` if every attempt timed out.
    pub async fn request(&mut self, message: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.request_matching(message, |_| true).await
    }

    /// Sends `message` and returns the first reply `accept` takes.
    ///
    /// Stale datagrams are drained before the first send. Within an
    /// attempt, rejected datagrams are dropped and the wait goes on until
    /// the attempt's deadline. A timed-out attempt resends the identical
    /// bytes, up to `max_retransmissions` times. Any other error ends the
    /// request at once.
    ///
    /// # Errors
    /// `TransportError::TimeoutExceeded` if no attempt got an accepted
    /// reply.
    pub async fn request_matching<F>(
        &mut self,
        message: &[u8],
        mut accept: F,
    ) -> Result<Vec<u8>, TransportError>
    where
        F: FnMut(&[u8]) -> bool,
    {
        self.drain().await;
        let attempts = self.policy.max_attempts();

        for attempt in 1..=attempts {
            self.send(message).await?;
            let deadline = Instant::now() + self.policy.attempt_timeout;

            while let Ok(received) = time::timeout_at(deadline, self.datagram.recv()).await {
                let reply = received?;
                if accept(&reply) {
                    if attempt > 1 {
                        debug!(river = %self.river, attempt, "reply after resend");
                    }
                    return Ok(reply);
                }
                debug!(river = %self.river, len = reply.len(), "unexpected datagram dropped");
            }

            if attempt < attempts {
                warn!(
                    river = %self.river,
                    attempt,
                    timeout = ?self.policy.attempt_timeout,
                    "no reply, resending"
                );
            }
        }

        Err(TransportError::TimeoutExceeded {
            river: self.river,
            attempts,
        })
    }

    /// Gives back the underlying datagram.
    pub fn into_inner(self) -> D {
        self.datagram
    }
}
