//! Wire protocol for Bridgefire.
//!
//! This crate defines the "language" the client and the game server speak:
//!
//! - **Types** ([`RiverId`], [`ShipId`], [`Inventory`], [`TurnReport`]):
//!   identities and the payloads the client reads out of replies.
//! - **Requests** ([`Request`], [`WireValue`]): what the client sends,
//!   with every value's wire representation chosen explicitly.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how requests become
//!   bytes and how reply bytes become [`Fields`].
//! - **Errors** ([`ProtocolError`]): what can go wrong on either side.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw datagrams) and the
//! orchestrator. It doesn't know about sockets or retries.
//!
//! ```text
//! Transport (bytes) → Protocol (Fields) → Orchestrator → Board
//! ```

mod codec;
mod error;
mod fields;
mod request;
mod types;
mod value;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use fields::{field, Fields, GAME_OVER};
pub use request::Request;
pub use types::{
    CannonPlacement, Inventory, RiverId, ShipEntry, ShipId, TurnReport,
    RIVER_COUNT, ROW_COUNT,
};
pub use value::WireValue;
