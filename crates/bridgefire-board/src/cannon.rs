//! Cannons and the shots they can take.

use bridgefire_protocol::{RiverId, ShipId};

/// Which side of a boundary row a ship approaches from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// From the lower-indexed river, `row - 1`.
    Before,
    /// From the higher-indexed river, `row`.
    After,
}

impl Side {
    /// The river a shot at a cannon on `row` must be sent to.
    ///
    /// `None` where no such river exists: `Before` on row 0 and `After` on
    /// the last row.
    pub fn target(self, row: usize) -> Option<RiverId> {
        match self {
            Self::Before => row.checked_sub(1).and_then(RiverId::new),
            Self::After => RiverId::new(row),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// A firing decision produced by [`Board::pending_shots`](crate::Board::pending_shots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shot {
    pub row: usize,
    /// 0-based position on the row.
    pub position: usize,
    pub side: Side,
    pub ship: ShipId,
    pub target: RiverId,
}

impl Shot {
    /// The 1-based bridge number the server uses for this position.
    pub fn bridge(&self) -> u32 {
        self.position as u32 + 1
    }
}

/// One position on a boundary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cannon {
    position: usize,
    active: bool,
    pub(crate) before: Vec<ShipId>,
    pub(crate) after: Vec<ShipId>,
}

impl Cannon {
    pub(crate) fn new(position: usize) -> Self {
        Self {
            position,
            active: false,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Only called while the board is built; there is no way back.
    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ships sighted this turn coming from the lower river, oldest first.
    pub fn before(&self) -> &[ShipId] {
        &self.before
    }

    /// Ships sighted this turn coming from the higher river, oldest first.
    pub fn after(&self) -> &[ShipId] {
        &self.after
    }

    pub(crate) fn clear(&mut self) {
        self.before.clear();
        self.after.clear();
    }

    /// The shot this cannon wants to take, if any.
    ///
    /// `Before` wins over `After`. A side with no river to fire into is
    /// passed over.
    pub(crate) fn pending_shot(&self, row: usize) -> Option<Shot> {
        if !self.active {
            return None;
        }

        [(Side::Before, &self.before), (Side::After, &self.after)]
            .into_iter()
            .find_map(|(side, queue)| {
                let ship = queue.first()?;
                match side.target(row) {
                    Some(target) => Some(Shot {
                        row,
                        position: self.position,
                        side,
                        ship: ship.clone(),
                        target,
                    }),
                    None => {
                        tracing::warn!(
                            row,
                            position = self.position,
                            %side,
                            "sighting with no river to fire into, skipped"
                        );
                        None
                    }
                }
            })
    }
}
