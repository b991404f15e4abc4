//! Transport layer for Bridgefire.
//!
//! The game server exposes one UDP endpoint per river. Datagrams get lost,
//! so every request is sent again until a reply shows up or the retry
//! budget runs out. This crate provides:
//!
//! - [`Datagram`]: the socket abstraction (send one datagram, receive one)
//! - [`UdpDatagram`]: the real thing, a connected tokio `UdpSocket`
//! - [`MemoryDatagram`]: an in-process pair for tests and simulation
//! - [`RiverChannel`]: one river's request/reply primitive with retry

#![allow(async_fn_in_trait)]

mod channel;
mod error;
mod memory;
mod udp;

pub use channel::{RetryPolicy, RiverChannel};
pub use error::TransportError;
pub use memory::MemoryDatagram;
pub use udp::{connect_rivers, UdpDatagram, MAX_DATAGRAM_SIZE};

/// A message-oriented, unreliable link to one peer.
///
/// Implementations must make `recv` cancel safe: a request drops the
/// pending `recv` future when its attempt timeout fires, and no datagram
/// may be lost because of that.
pub trait Datagram: Send + Sync + 'static {
    /// Sends one datagram to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Waits for the next datagram from the peer.
    async fn recv(&self) -> Result<Vec<u8>, TransportError>;
}
