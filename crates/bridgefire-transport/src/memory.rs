//! In-process datagram pair.

use tokio::sync::{mpsc, Mutex};

use crate::{Datagram, TransportError};

/// One end of an in-memory datagram link.
///
/// Delivery is lossless and ordered; loss is simulated by the peer simply
/// not answering. Used by tests to stand in for the game server.
pub struct MemoryDatagram {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl MemoryDatagram {
    /// Creates two connected ends. What one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (
            Self {
                tx: a_tx,
                rx: Mutex::new(b_rx),
            },
            Self {
                tx: b_tx,
                rx: Mutex::new(a_rx),
            },
        )
    }
}

impl Datagram for MemoryDatagram {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.tx
            .send(data.to_vec())
            .map_err(|_| TransportError::Closed("peer dropped".into()))
    }

    async fn recv(&self) -> Result<Vec<u8>, TransportError> {
        // `UnboundedReceiver::recv` is cancel safe.
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| TransportError::Closed("peer dropped".into()))
    }
}
