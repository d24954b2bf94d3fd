/// Level generator: deterministic, table-driven obstacle layouts.
///
/// ## Layouts (lane, direction)
///   Level 1  hazards   (4,→) (5,←) (6,→) (7,←)
///            platforms (1,→) (2,←) (3,→)
///   Level 2  hazards   both directions in lanes 4-7
///            platforms both directions in lanes 1-3
///
/// Any other level number produces an empty board. Generation replaces
/// both obstacle collections and never touches goal slots.

use crate::domain::constants::{FINAL_LEVEL, LEVEL_INTERVALS_MS};
use crate::domain::entity::{GoalSlot, Obstacle, ObstacleKind};
use crate::sim::world::WorldState;

/// (lane, rightward)
type LaneSpec = (usize, bool);

const LEVEL_1_HAZARDS: &[LaneSpec] = &[(4, true), (5, false), (6, true), (7, false)];
const LEVEL_1_PLATFORMS: &[LaneSpec] = &[(1, true), (2, false), (3, true)];

const LEVEL_2_HAZARDS: &[LaneSpec] = &[
    (4, true), (4, false),
    (5, false), (5, true),
    (6, true), (6, false),
    (7, false), (7, true),
];
const LEVEL_2_PLATFORMS: &[LaneSpec] = &[
    (1, true), (1, false),
    (2, false), (2, true),
    (3, true), (3, false),
];

/// Obstacles for `level`, hazards then platforms.
pub fn layout(level: u32) -> (Vec<Obstacle>, Vec<Obstacle>) {
    let (hazards, platforms): (&[LaneSpec], &[LaneSpec]) = match level {
        1 => (LEVEL_1_HAZARDS, LEVEL_1_PLATFORMS),
        2 => (LEVEL_2_HAZARDS, LEVEL_2_PLATFORMS),
        _ => {
            log::warn!("no layout for level {level}, board left empty");
            (&[], &[])
        }
    };
    (
        build(ObstacleKind::Hazard, hazards),
        build(ObstacleKind::Platform, platforms),
    )
}

/// Clear and repopulate the world's obstacles for `level`.
pub fn generate(world: &mut WorldState, level: u32) {
    world.hazards.clear();
    world.platforms.clear();
    let (hazards, platforms) = layout(level);
    world.hazards = hazards;
    world.platforms = platforms;
    log::debug!(
        "level {level}: {} hazards, {} platforms",
        world.hazards.len(), world.platforms.len(),
    );
}

pub fn reset_goals(goals: &mut [GoalSlot]) {
    for g in goals {
        g.filled = false;
    }
}

/// Tick interval for `level`. Levels past the last tier reuse the fastest.
pub fn tick_interval(level: u32) -> u64 {
    let idx = (level.clamp(1, FINAL_LEVEL) - 1) as usize;
    LEVEL_INTERVALS_MS[idx]
}

fn build(kind: ObstacleKind, specs: &[LaneSpec]) -> Vec<Obstacle> {
    specs.iter()
        .map(|&(lane, rightward)| Obstacle::new(kind, lane, rightward))
        .collect()
}
