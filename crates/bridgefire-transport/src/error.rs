use bridgefire_protocol::RiverId;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No reply arrived on any attempt of a request.
    #[error("{river}: no reply after {attempts} attempts")]
    TimeoutExceeded { river: RiverId, attempts: u32 },

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed (e.g. the peer's port is unreachable).
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or connecting the local socket failed.
    #[error("bind failed: {0}")]
    BindFailed(#[source] std::io::Error),

    /// The host name could not be resolved to any address.
    #[error("could not resolve {host}:{port}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: Option<std::io::Error>,
    },

    /// `base_port + river` does not fit in a port number.
    #[error("base port {0} leaves no room for every river")]
    PortRange(u16),

    /// The other end of an in-memory datagram was dropped.
    #[error("channel closed: {0}")]
    Closed(String),
}

impl TransportError {
    /// Returns `true` if this error means every attempt timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutExceeded { .. })
    }
}
