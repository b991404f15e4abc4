//! The board: five boundary rows of cannons between four rivers.

use std::fmt;

use bridgefire_protocol::{Inventory, RiverId, ShipId, TurnReport, ROW_COUNT};

use crate::{BoardError, Cannon, Shot};

/// Largest bridge number an inventory may declare.
pub const MAX_BRIDGES: usize = 1024;

/// The client's picture of the game.
///
/// ```text
///  row 0 | river 0 | row 1 | river 1 | row 2 | river 2 | row 3 | river 3 | row 4
/// ```
///
/// A ship seen on river `r` is heading for both boundaries of that river:
/// it shows up in row `r`'s "after" queue and row `r + 1`'s "before" queue.
/// Row 0 therefore only ever collects "after" entries and row 4 only
/// "before" entries.
///
/// The row/position layout and the `active` flags are fixed once the board
/// is built. The sighting queues last one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Vec<Cannon>; ROW_COUNT],
    n_bridges: usize,
}

impl Board {
    /// Builds the board from the `getcannons` reply.
    ///
    /// Entries may come in any order. The bridge count is the largest
    /// bridge number declared, and every row gets that many cannons before
    /// any of them is activated.
    ///
    /// # Errors
    /// `BoardError::EmptyInventory` if no cannon is declared,
    /// `BoardError::RowOutOfRange` for a row past the last boundary,
    /// `BoardError::BridgeOutOfRange` for bridge 0 or one past
    /// [`MAX_BRIDGES`].
    pub fn from_inventory(inventory: &Inventory) -> Result<Self, BoardError> {
        if inventory.cannons.is_empty() {
            return Err(BoardError::EmptyInventory);
        }

        let mut n_bridges = 0;
        for placement in &inventory.cannons {
            if placement.row as usize >= ROW_COUNT {
                return Err(BoardError::RowOutOfRange(placement.row));
            }
            let bridge = placement.bridge as usize;
            if bridge == 0 || bridge > MAX_BRIDGES {
                return Err(BoardError::BridgeOutOfRange {
                    bridge: placement.bridge,
                    n_bridges: MAX_BRIDGES,
                });
            }
            n_bridges = n_bridges.max(bridge);
        }

        let mut rows: [Vec<Cannon>; ROW_COUNT] =
            std::array::from_fn(|_| (0..n_bridges).map(Cannon::new).collect());

        for placement in &inventory.cannons {
            rows[placement.row as usize][placement.bridge as usize - 1].activate();
        }

        let board = Self { rows, n_bridges };
        tracing::debug!(
            n_bridges,
            active = board.active_count(),
            "board built from inventory"
        );
        Ok(board)
    }

    /// Number of bridges (cannons per row).
    pub fn n_bridges(&self) -> usize {
        self.n_bridges
    }

    /// Number of boundary rows. Always [`ROW_COUNT`].
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The cannon at `row`, 0-based `position`.
    pub fn cannon(&self, row: usize, position: usize) -> Option<&Cannon> {
        self.rows.get(row)?.get(position)
    }

    /// All cannons of one row, in position order.
    pub fn row(&self, row: usize) -> Option<&[Cannon]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// How many cannons the player owns.
    pub fn active_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| c.is_active())
            .count()
    }

    /// Folds one river's turn report into the queues.
    ///
    /// Returns the number of ships recorded.
    ///
    /// # Errors
    /// `BoardError::BridgeOutOfRange` if the report's bridge isn't on the
    /// board. The board is left untouched.
    pub fn record_sighting(
        &mut self,
        river: RiverId,
        report: &TurnReport,
    ) -> Result<usize, BoardError> {
        let bridge = report.bridge as usize;
        if bridge == 0 || bridge > self.n_bridges {
            return Err(BoardError::BridgeOutOfRange {
                bridge: report.bridge,
                n_bridges: self.n_bridges,
            });
        }
        let position = bridge - 1;
        let row = river.index();

        self.rows[row][position]
            .after
            .extend(report.ships.iter().cloned());
        self.rows[row + 1][position]
            .before
            .extend(report.ships.iter().cloned());

        Ok(report.ships.len())
    }

    /// Empties every sighting queue. Layout and `active` flags stay.
    pub fn clear_turn(&mut self) {
        self.rows.iter_mut().flatten().for_each(Cannon::clear);
    }

    /// The shots to take this turn, row by row, then position by position.
    ///
    /// Each active cannon yields at most one shot, at the first ship in its
    /// "before" queue, or failing that its "after" queue.
    pub fn pending_shots(&self) -> impl Iterator<Item = Shot> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cannons)| {
            cannons.iter().filter_map(move |c| c.pending_shot(row))
        })
    }
}

/// One line per row: `*` marks an active cannon, then its queues.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cannons) in self.rows.iter().enumerate() {
            write!(f, "row {row}:")?;
            for c in cannons {
                let mark = if c.is_active() { "*" } else { "" };
                write!(f, " {}{mark}", c.position() + 1)?;
                write_queue(f, c.before())?;
                write_queue(f, c.after())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_queue(f: &mut fmt::Formatter<'_>, ships: &[ShipId]) -> fmt::Result {
    f.write_str("[")?;
    for (i, ship) in ships.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{ship}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use bridgefire_protocol::CannonPlacement;

    use super::*;

    fn inventory(pairs: &[(u32, u32)]) -> Inventory {
        Inventory {
            cannons: pairs.iter().copied().map(CannonPlacement::from).collect(),
        }
    }

    #[test]
    fn test_empty_inventory_is_rejected() {
        let err = Board::from_inventory(&Inventory::default()).unwrap_err();
        assert_eq!(err, BoardError::EmptyInventory);
    }

    #[test]
    fn test_bridge_count_is_capped() {
        let widest =
            Board::from_inventory(&inventory(&[(MAX_BRIDGES as u32, 4)])).unwrap();
        assert_eq!(widest.n_bridges(), MAX_BRIDGES);

        let err =
            Board::from_inventory(&inventory(&[(1, 0), (u32::MAX, 0)])).unwrap_err();
        assert_eq!(
            err,
            BoardError::BridgeOutOfRange {
                bridge: u32::MAX,
                n_bridges: MAX_BRIDGES,
            }
        );
    }

    #[test]
    fn test_rejects_row_past_last_boundary() {
        let err = Board::from_inventory(&inventory(&[(1, 5)])).unwrap_err();
        assert_eq!(err, BoardError::RowOutOfRange(5));
    }

    #[test]
    fn test_rejects_bridge_zero() {
        let err = Board::from_inventory(&inventory(&[(0, 1)])).unwrap_err();
        assert!(matches!(err, BoardError::BridgeOutOfRange { bridge: 0, .. }));
    }

    #[test]
    fn test_duplicate_declaration_is_one_cannon() {
        let board = Board::from_inventory(&inventory(&[(2, 3), (2, 3)])).unwrap();
        assert_eq!(board.active_count(), 1);
    }

    #[test]
    fn test_sighting_out_of_range_leaves_board_untouched() {
        let mut board = Board::from_inventory(&inventory(&[(2, 1)])).unwrap();
        let before = board.clone();
        let report = TurnReport {
            bridge: 3,
            ships: vec![ShipId::Number(1)],
        };

        let err = board.record_sighting(RiverId::ALL[0], &report).unwrap_err();
        assert_eq!(
            err,
            BoardError::BridgeOutOfRange {
                bridge: 3,
                n_bridges: 2,
            }
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_display() {
        let mut board = Board::from_inventory(&inventory(&[(1, 1), (2, 0)])).unwrap();
        let report = TurnReport {
            bridge: 1,
            ships: vec![ShipId::Number(7)],
        };
        board.record_sighting(RiverId::ALL[0], &report).unwrap();

        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "row 0: 1[][7] 2*[][]");
        assert_eq!(lines[1], "row 1: 1*[7][] 2[][]");
    }
}
