/// Entities: Player, Obstacle (hazard or platform), GoalSlot.
///
/// The player is authoritative on the grid; its pixel rect is derived and
/// only ever rebuilt from `(col, row)`. Obstacles are authoritative in pixels.

use super::board::Terrain;
use super::constants::{
    CELL_SIZE, COLUMNS, GOAL_HEIGHT, GOAL_WIDTH, HAZARD_HEIGHT, HAZARD_SPEED, HAZARD_WIDTH,
    LANES, PLATFORM_HEIGHT, PLATFORM_SPEED, PLATFORM_WIDTH, PLAYER_SIZE, SCREEN_WIDTH,
    START_CELL,
};
use super::geometry::{to_pixel_rect, Rect};

/// Discrete movement intent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    pub const ALL: [MoveDir; 4] = [MoveDir::Up, MoveDir::Down, MoveDir::Left, MoveDir::Right];
}

// ── Player ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub col: usize,
    pub row: usize,
    /// Hit rectangle. Rebuilt from `(col, row)` by `refresh_rect`.
    pub rect: Rect,
}

impl Player {
    pub fn new() -> Self {
        let mut p = Player { col: START_CELL.0, row: START_CELL.1, rect: Rect::default() };
        p.refresh_rect();
        p
    }

    /// Apply one bound-checked step. Returns true if the cell changed.
    /// Collision evaluation is the caller's job.
    pub fn step(&mut self, dir: MoveDir) -> bool {
        let before = (self.col, self.row);
        match dir {
            MoveDir::Up if self.row > 0 => self.row -= 1,
            MoveDir::Down if self.row + 1 < LANES => self.row += 1,
            MoveDir::Left if self.col > 0 => self.col -= 1,
            MoveDir::Right if self.col + 1 < COLUMNS => self.col += 1,
            _ => {}
        }
        before != (self.col, self.row)
    }

    /// Rebuild the hit rect from the grid cell, discarding any pixel offset.
    pub fn refresh_rect(&mut self) {
        self.rect = to_pixel_rect(self.col, self.row, PLAYER_SIZE, CELL_SIZE);
    }

    pub fn reset_to_start(&mut self) {
        self.col = START_CELL.0;
        self.row = START_CELL.1;
        self.refresh_rect();
    }

    pub fn is_in_water_band(&self) -> bool {
        Terrain::of_row(self.row).is_water()
    }

    /// Test/scenario helper: put the player on an arbitrary cell.
    #[cfg(test)]
    pub fn place(&mut self, col: usize, row: usize) {
        self.col = col;
        self.row = row;
        self.refresh_rect();
    }
}

// ── Obstacles ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObstacleKind {
    Hazard,   // ends a life on contact
    Platform, // must be ridden across water
}

impl ObstacleKind {
    pub fn speed(self) -> i32 {
        match self {
            ObstacleKind::Hazard => HAZARD_SPEED,
            ObstacleKind::Platform => PLATFORM_SPEED,
        }
    }

    /// (width, height) in pixels.
    pub fn size(self) -> (i32, i32) {
        match self {
            ObstacleKind::Hazard => (HAZARD_WIDTH, HAZARD_HEIGHT),
            ObstacleKind::Platform => (PLATFORM_WIDTH, PLATFORM_HEIGHT),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub lane: usize,
    /// true = travels toward increasing x.
    pub rightward: bool,
    pub x: i32,
    pub y: i32,
}

impl Obstacle {
    /// Spawns at the edge it travels away from: x = 0 going right,
    /// x = SCREEN_WIDTH going left. Vertically centered in its lane.
    pub fn new(kind: ObstacleKind, lane: usize, rightward: bool) -> Self {
        let (_, h) = kind.size();
        Obstacle {
            kind,
            lane,
            rightward,
            x: if rightward { 0 } else { SCREEN_WIDTH },
            y: lane as i32 * CELL_SIZE + (CELL_SIZE - h) / 2,
        }
    }

    pub fn width(&self) -> i32 {
        self.kind.size().0
    }

    /// Signed per-tick displacement.
    pub fn velocity(&self) -> i32 {
        if self.rightward { self.kind.speed() } else { -self.kind.speed() }
    }

    pub fn rect(&self) -> Rect {
        let (w, h) = self.kind.size();
        Rect::new(self.x, self.y, w, h)
    }
}

// ── Goal slots ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalSlot {
    pub rect: Rect,
    pub filled: bool,
}

impl GoalSlot {
    pub fn new(x: i32, y: i32) -> Self {
        GoalSlot { rect: Rect::new(x, y, GOAL_WIDTH, GOAL_HEIGHT), filled: false }
    }
}
