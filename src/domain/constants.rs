/// Compiled-in game constants.
///
/// Everything the simulation needs about board geometry, speeds and
/// scoring lives here. None of it is configurable at runtime; the
/// `const` assertions at the bottom reject inconsistent values at build time.

// ── Board ──

pub const LANES: usize = 10;
pub const COLUMNS: usize = 9;
pub const CELL_SIZE: i32 = 60;

pub const SCREEN_WIDTH: i32 = 560;
pub const SCREEN_HEIGHT: i32 = 600;

/// Rows by terrain: goal [0], water [1..=3], road [4..=7], safe [8..=9].
pub const GOAL_ROW: usize = 0;
pub const WATER_ROWS: (usize, usize) = (1, 3);
pub const ROAD_ROWS: (usize, usize) = (4, 7);

// ── Player ──

pub const START_CELL: (usize, usize) = (5, 9);
pub const PLAYER_SIZE: i32 = 40;
pub const INITIAL_LIVES: u32 = 3;

// ── Obstacles ──

pub const HAZARD_WIDTH: i32 = 80;
pub const HAZARD_HEIGHT: i32 = 40;
pub const HAZARD_SPEED: i32 = 3;

pub const PLATFORM_WIDTH: i32 = 120;
pub const PLATFORM_HEIGHT: i32 = 40;
pub const PLATFORM_SPEED: i32 = 2;

// ── Goal slots ──

pub const GOAL_COUNT: usize = 5;
pub const GOAL_WIDTH: i32 = 80;
pub const GOAL_HEIGHT: i32 = 40;
pub const GOAL_FIRST_X: i32 = 40;
pub const GOAL_STRIDE: i32 = 120;
pub const GOAL_Y: i32 = 10;

// ── Levels / pacing ──

pub const FINAL_LEVEL: u32 = 2;
/// Tick interval per level, index 0 = level 1. Lower is faster.
pub const LEVEL_INTERVALS_MS: [u64; FINAL_LEVEL as usize] = [300, 200];

// ── Scoring ──

pub const GOAL_POINTS_PER_LEVEL: u32 = 100;
pub const BOUNDARY_BONUS: u32 = 50;
pub const COMPLETION_BONUS: u32 = 500;

// ── Build-time validation ──

const _: () = assert!(START_CELL.0 < COLUMNS && START_CELL.1 < LANES);
const _: () = assert!(PLAYER_SIZE <= CELL_SIZE);
const _: () = assert!(HAZARD_HEIGHT <= CELL_SIZE && PLATFORM_HEIGHT <= CELL_SIZE);
const _: () = assert!(WATER_ROWS.1 < ROAD_ROWS.0 && ROAD_ROWS.1 < LANES);
const _: () = assert!(GOAL_FIRST_X + (GOAL_COUNT as i32 - 1) * GOAL_STRIDE < SCREEN_WIDTH);
const _: () = assert!(LANES as i32 * CELL_SIZE <= SCREEN_HEIGHT);
const _: () = assert!(LEVEL_INTERVALS_MS[0] > LEVEL_INTERVALS_MS[1]);
