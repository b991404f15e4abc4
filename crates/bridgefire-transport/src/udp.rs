//! UDP transport: one connected socket per river.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use bridgefire_protocol::RiverId;
use tokio::net::{lookup_host, UdpSocket};

use crate::{Datagram, RetryPolicy, RiverChannel, TransportError};

/// Largest reply the client will read. Longer datagrams are truncated.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// A [`Datagram`] over a UDP socket connected to one peer.
///
/// Connecting the socket makes the kernel drop datagrams from any other
/// source, so every reply read here came from this river's server.
pub struct UdpDatagram {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpDatagram {
    /// Binds an ephemeral local port of the peer's address family and
    /// connects it to `peer`.
    pub async fn connect(peer: SocketAddr) -> Result<Self, TransportError> {
        let local: SocketAddr = if peer.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local)
            .await
            .map_err(TransportError::BindFailed)?;
        socket
            .connect(peer)
            .await
            .map_err(TransportError::BindFailed)?;

        tracing::debug!(%peer, "UDP socket connected");
        Ok(Self { socket, peer })
    }

    /// Resolves `host:port` and returns the first address found.
    pub async fn resolve(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
        let mut addrs = lookup_host((host, port))
            .await
            .map_err(|e| TransportError::Resolve {
                host: host.to_string(),
                port,
                source: Some(e),
            })?;
        addrs.next().ok_or_else(|| TransportError::Resolve {
            host: host.to_string(),
            port,
            source: None,
        })
    }

    /// The address this socket is connected to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// The local address the socket is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Datagram for UdpDatagram {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        self.socket
            .send(data)
            .await
            .map(|_| ())
            .map_err(TransportError::SendFailed)
    }

    async fn recv(&self) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let n = self
            .socket
            .recv(&mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// Opens one channel per river, river `i` talking to `host:(base_port + i)`.
///
/// # Errors
/// `TransportError::PortRange` if the ports would overflow, `Resolve` if
/// the host has no address, `BindFailed` if a socket can't be set up.
pub async fn connect_rivers(
    host: &str,
    base_port: u16,
    policy: RetryPolicy,
) -> Result<Vec<RiverChannel<UdpDatagram>>, TransportError> {
    let mut channels = Vec::with_capacity(RiverId::ALL.len());

    for river in RiverId::ALL {
        let port = base_port
            .checked_add(river.port_offset())
            .ok_or(TransportError::PortRange(base_port))?;
        let peer = UdpDatagram::resolve(host, port).await?;
        let datagram = UdpDatagram::connect(peer).await?;
        tracing::info!(%river, %peer, "river connected");
        channels.push(RiverChannel::new(river, datagram, policy));
    }

    Ok(channels)
}
