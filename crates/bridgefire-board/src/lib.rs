//! Board model for Bridgefire.
//!
//! Five boundary rows of cannons sit between four rivers. Each turn the
//! rivers report which ships they see at which bridge; the board files
//! every sighting under the two cannons the ship is heading for and then
//! hands out one shot per active cannon that has a target.
//!
//! # Key types
//!
//! - [`Board`]: the grid, built once from the inventory reply
//! - [`Cannon`]: one position with its per-turn sighting queues
//! - [`Shot`]: a firing decision, already resolved to a target river
//! - [`Side`]: which river a sighting came from, relative to a row

mod board;
mod cannon;
mod error;

pub use board::{Board, MAX_BRIDGES};
pub use cannon::{Cannon, Shot, Side};
pub use error::BoardError;
