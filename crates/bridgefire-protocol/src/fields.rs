//! Decoded replies as a tree of named fields.
//!
//! The game server's replies are loosely shaped: a `type` tag plus whatever
//! fields that type carries. Rather than one big enum that must know every
//! reply the server could ever send, a reply is kept as a JSON object and
//! the client asks for the typed view it expects at that point of the game.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{CannonPlacement, Inventory, ProtocolError, ShipEntry, TurnReport};

/// Top-level field names used by the protocol.
pub mod field {
    pub const TYPE: &str = "type";
    pub const AUTH: &str = "auth";
    pub const TURN: &str = "turn";
    pub const CANNON: &str = "cannon";
    pub const CANNONS: &str = "cannons";
    pub const SHIPS: &str = "ships";
    pub const BRIDGE: &str = "bridge";
    pub const ID: &str = "id";
}

/// The `type` value that ends the game.
pub const GAME_OVER: &str = "gameover";

/// A decoded reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Wraps an already-parsed JSON value. Fails unless it is an object.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ProtocolError::NotAnObject),
        }
    }

    /// Returns a raw field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    fn require(&self, name: &'static str) -> Result<&Value, ProtocolError> {
        self.0.get(name).ok_or(ProtocolError::MissingField(name))
    }

    /// The reply's `type` tag.
    pub fn message_type(&self) -> Result<&str, ProtocolError> {
        self.require(field::TYPE)?
            .as_str()
            .ok_or_else(|| ProtocolError::InvalidField {
                field: field::TYPE,
                reason: "expected a string".into(),
            })
    }

    /// Returns `true` if this reply is the server's termination signal.
    pub fn is_game_over(&self) -> Result<bool, ProtocolError> {
        Ok(self.message_type()? == GAME_OVER)
    }

    /// Reads the `cannons` array of an inventory reply.
    pub fn inventory(&self) -> Result<Inventory, ProtocolError> {
        let cannons = Vec::<CannonPlacement>::deserialize(
            self.require(field::CANNONS)?,
        )
        .map_err(|e| invalid(field::CANNONS, e))?;
        Ok(Inventory { cannons })
    }

    /// Reads the `bridge` and `ships` fields of a turn report.
    pub fn turn_report(&self) -> Result<TurnReport, ProtocolError> {
        let bridge = u32::deserialize(self.require(field::BRIDGE)?)
            .map_err(|e| invalid(field::BRIDGE, e))?;

        let entries = self
            .require(field::SHIPS)?
            .as_array()
            .ok_or_else(|| ProtocolError::InvalidField {
                field: field::SHIPS,
                reason: "expected an array".into(),
            })?;

        let mut ships = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.get(field::ID).is_none() {
                return Err(ProtocolError::MissingField(field::ID));
            }
            let entry = ShipEntry::deserialize(entry)
                .map_err(|e| invalid(field::ID, e))?;
            ships.push(entry.id);
        }

        Ok(TurnReport { bridge, ships })
    }
}

fn invalid(field: &'static str, err: serde_json::Error) -> ProtocolError {
    ProtocolError::InvalidField {
        field,
        reason: err.to_string(),
    }
}

/// Renders the reply back as compact JSON, e.g. for the game-over report.
impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
