//! # Bridgefire
//!
//! Client for a turn-based river-and-cannons game played over UDP.
//!
//! The server runs four rivers, each on its own port. Every turn the
//! client asks each river which ships it sees at which bridge, then fires
//! the player's cannons at them. The game ends when any river answers
//! with `gameover`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bridgefire::{ClientConfig, Orchestrator};
//!
//! # async fn play() -> Result<(), bridgefire::ClientError> {
//! let config = ClientConfig::new("game.example.net", 51511, "s3cret");
//! let outcome = Orchestrator::connect(config).await?.run().await?;
//! println!("{}", outcome.final_message);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod logging;
mod orchestrator;
mod phase;

pub use config::ClientConfig;
pub use error::ClientError;
pub use logging::init_logging;
pub use orchestrator::{GameOutcome, Orchestrator};
pub use phase::Phase;

/// Commonly used types, re-exported from every layer.
pub mod prelude {
    pub use crate::{ClientConfig, ClientError, GameOutcome, Orchestrator, Phase};
    pub use bridgefire_board::{Board, Cannon, Shot, Side};
    pub use bridgefire_protocol::{Codec, Fields, JsonCodec, Request, RiverId, ShipId, WireValue};
    pub use bridgefire_transport::{
        Datagram, MemoryDatagram, RetryPolicy, RiverChannel, UdpDatagram,
    };
}
