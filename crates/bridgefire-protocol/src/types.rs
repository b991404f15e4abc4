//! Core protocol types for Bridgefire's wire format.
//!
//! These are the identity and payload types that both the request side
//! (what the client sends) and the reply side (what the game server sends
//! back) agree on. The transport moves bytes, the board stores these.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Number of channel endpoints ("rivers") a game is split across.
pub const RIVER_COUNT: usize = 4;

/// Number of boundary rows on the board. Always one more than the number
/// of rivers: row `r` sits between river `r - 1` and river `r`.
pub const ROW_COUNT: usize = RIVER_COUNT + 1;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies one of the four rivers, and therefore one transport channel.
///
/// Newtype over `u8` so a river index can't be confused with a row or a
/// bridge position. The only way to build one is [`RiverId::new`] (or
/// [`RiverId::ALL`]), which keeps the value in `0..RIVER_COUNT`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct RiverId(u8);

impl RiverId {
    /// Every river, in index order.
    pub const ALL: [RiverId; RIVER_COUNT] =
        [RiverId(0), RiverId(1), RiverId(2), RiverId(3)];

    /// Returns the river with the given index, or `None` if there is no
    /// such river.
    pub fn new(index: usize) -> Option<Self> {
        if index < RIVER_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// The river's position in `0..RIVER_COUNT`.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Port offset of this river's endpoint from the game's base port.
    pub fn port_offset(self) -> u16 {
        u16::from(self.0)
    }
}

impl fmt::Display for RiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "river-{}", self.0)
    }
}

/// A ship identifier as the server sent it.
///
/// The game server uses JSON integers, but nothing in the protocol forbids
/// text ids, so both are accepted. Keeping the original shape means a shot
/// echoes the id back in the same JSON type it arrived in.
///
/// `#[serde(untagged)]` tries each variant in order: `7` becomes
/// `ShipId::Number(7)`, `"S1"` becomes `ShipId::Text("S1")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShipId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ShipId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ShipId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Reply payloads
// ---------------------------------------------------------------------------

/// One cannon declaration from the inventory reply.
///
/// On the wire this is a two-element array `[bridge, row]`, where `bridge`
/// is 1-based. `#[serde(from = ...)]` lets serde parse the tuple and then
/// convert it into the named struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(u32, u32)")]
pub struct CannonPlacement {
    /// 1-based bridge number.
    pub bridge: u32,
    /// Boundary row, expected in `0..ROW_COUNT`.
    pub row: u32,
}

impl From<(u32, u32)> for CannonPlacement {
    fn from((bridge, row): (u32, u32)) -> Self {
        Self { bridge, row }
    }
}

/// The `getcannons` reply: every cannon the player owns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inventory {
    pub cannons: Vec<CannonPlacement>,
}

/// A single entry in a turn report's `ships` array. Only `id` matters to
/// the client; hull and ship class are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShipEntry {
    pub id: ShipId,
}

/// A `getturn` reply: the ships one river sees at one bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// 1-based bridge number the ships were sighted at.
    pub bridge: u32,
    pub ships: Vec<ShipId>,
}
