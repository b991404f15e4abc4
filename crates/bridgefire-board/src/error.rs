//! Error types for the board layer.

/// Errors raised when a reply refers to a place that isn't on the board.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// An inventory entry names a row outside `0..ROW_COUNT`.
    #[error("row {0} does not exist")]
    RowOutOfRange(u32),

    /// The inventory declares no cannons, so there is no board to play on.
    #[error("inventory declares no cannons")]
    EmptyInventory,

    /// A bridge number is 0 or past the last bridge.
    #[error("bridge {bridge} is outside 1..={n_bridges}")]
    BridgeOutOfRange { bridge: u32, n_bridges: usize },
}
