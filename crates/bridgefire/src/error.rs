//! Unified error type for the Bridgefire client.

use bridgefire_board::BoardError;
use bridgefire_protocol::ProtocolError;
use bridgefire_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Only setup failures ever leave [`Orchestrator::run`](crate::Orchestrator::run):
/// once the turn loop starts, errors are logged and play goes on.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A transport-level error (timeout, socket, resolution).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A request couldn't be built or a reply couldn't be read.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The inventory doesn't fit the board.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The configuration can't be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}
