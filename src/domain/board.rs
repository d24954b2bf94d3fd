/// Terrain kinds and their row ranges.
/// The board never changes: terrain is a pure function of the row index,
/// so lane semantics are centralized here.

use super::constants::{GOAL_ROW, LANES, ROAD_ROWS, WATER_ROWS};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Terrain {
    Goal,  // row 0, holds the goal slots
    Water, // must ride a platform
    Road,  // hazards travel here
    Safe,  // start strip and median
}

impl Terrain {
    /// Terrain of a row. Rows past the board bottom count as safe ground.
    pub fn of_row(row: usize) -> Terrain {
        if row == GOAL_ROW {
            Terrain::Goal
        } else if (WATER_ROWS.0..=WATER_ROWS.1).contains(&row) {
            Terrain::Water
        } else if (ROAD_ROWS.0..=ROAD_ROWS.1).contains(&row) {
            Terrain::Road
        } else {
            Terrain::Safe
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, Terrain::Water)
    }
}

/// Terrain of every lane, top to bottom.
pub fn lanes() -> impl Iterator<Item = (usize, Terrain)> {
    (0..LANES).map(|row| (row, Terrain::of_row(row)))
}
