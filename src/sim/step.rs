/// The game state machine: every legal way to mutate a session.
///
/// Phases:
///   Start ──start_game──▶ Playing ──▶ GameOver | LevelComplete
///   LevelComplete ──next_level──▶ Playing
///   GameOver ──restart──▶ Playing,  GameOver ──return_to_menu──▶ Start
///
/// A turn is one fired `tick` or one `move_player`. Each turn ends with at
/// most one collision outcome acted on. Calls made in the wrong phase (or
/// while paused, for `tick` / `move_player`) are silent no-ops.

use crate::domain::constants::{
    BOUNDARY_BONUS, COMPLETION_BONUS, FINAL_LEVEL, GOAL_POINTS_PER_LEVEL, INITIAL_LIVES,
};
use crate::domain::entity::MoveDir;
use crate::domain::motion;
use crate::domain::rules::{self, Outcome};
use super::event::GameEvent;
use super::level;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Session control
// ══════════════════════════════════════════════════════════════

/// Begin a new session as `name` (blank becomes "Player").
pub fn start_game(world: &mut WorldState, name: &str) {
    let name = name.trim();
    world.player_name = if name.is_empty() { "Player".to_string() } else { name.to_string() };
    reset(world);
}

/// Restart after a finished session, keeping the player name.
pub fn restart(world: &mut WorldState) {
    if world.phase != Phase::GameOver { return; }
    reset(world);
}

pub fn return_to_menu(world: &mut WorldState) {
    if world.phase != Phase::GameOver { return; }
    world.phase = Phase::Start;
    world.paused = false;
}

pub fn next_level(world: &mut WorldState) {
    if world.phase != Phase::LevelComplete { return; }
    world.level += 1;
    enter_level(world);
    log::info!("advancing to level {}", world.level);
}

pub fn toggle_pause(world: &mut WorldState) {
    if world.phase != Phase::Playing { return; }
    world.paused = !world.paused;
}

fn reset(world: &mut WorldState) {
    world.level = 1;
    world.lives = INITIAL_LIVES;
    world.score = 0;
    world.paused = false;
    enter_level(world);
    log::info!("session started for {}", world.player_name);
}

/// Fresh attempt at `world.level`: obstacles, goals, player, pacing.
fn enter_level(world: &mut WorldState) {
    world.player.reset_to_start();
    level::reset_goals(&mut world.goals);
    let n = world.level;
    level::generate(world, n);
    world.tick_interval_ms = level::tick_interval(n);
    world.phase = Phase::Playing;
}

// ══════════════════════════════════════════════════════════════
// Turns
// ══════════════════════════════════════════════════════════════

fn is_live(world: &WorldState) -> bool {
    world.phase == Phase::Playing && !world.paused
}

/// Advance obstacles and run a collision pass, at most once per interval.
/// `now_ms` is a monotonic clock reading.
pub fn tick(world: &mut WorldState, now_ms: u64) -> Vec<GameEvent> {
    if !is_live(world) { return vec![]; }
    if now_ms.saturating_sub(world.last_tick_ms) <= world.tick_interval_ms { return vec![]; }

    world.last_tick_ms = now_ms;
    world.tick += 1;

    motion::advance_all(&mut world.hazards);
    motion::advance_all(&mut world.platforms);

    let mut events = Vec::new();
    resolve_collisions(world, &mut events);
    events
}

/// Apply a player move; a real move gets an immediate collision pass.
pub fn move_player(world: &mut WorldState, dir: MoveDir) -> Vec<GameEvent> {
    if !is_live(world) { return vec![]; }
    if !world.player.step(dir) { return vec![]; }

    let mut events = vec![GameEvent::Hopped { col: world.player.col, row: world.player.row }];
    resolve_collisions(world, &mut events);
    events
}

// ══════════════════════════════════════════════════════════════
// Outcome handling
// ══════════════════════════════════════════════════════════════

fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    world.player.refresh_rect();
    let detection = rules::detect(
        &world.player, &world.hazards, &world.platforms, &mut world.goals,
    );

    // Platform carry: shifts the rect only until the next refresh.
    if let Some(dx) = detection.carry {
        world.player.rect = world.player.rect.shifted_x(dx);
    }

    match detection.outcome {
        Outcome::Drowned => {
            events.push(GameEvent::Drowned);
            lose_life(world, events);
        }
        Outcome::Crushed => {
            events.push(GameEvent::Crushed);
            lose_life(world, events);
        }
        Outcome::GoalReached { slot } => {
            let points = GOAL_POINTS_PER_LEVEL * world.level;
            world.score += points;
            world.player.reset_to_start();
            events.push(GameEvent::GoalReached { slot, points });
            log::debug!("goal {slot} filled ({}/{})", world.goals_filled(), world.goals.len());
            if world.all_goals_filled() {
                complete_level(world, events);
            }
        }
        Outcome::BoundaryBonus => {
            world.score += BOUNDARY_BONUS;
            world.player.reset_to_start();
            events.push(GameEvent::BoundaryBonus { points: BOUNDARY_BONUS });
        }
        Outcome::NoEvent => {}
    }
}

fn lose_life(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    world.lives = world.lives.saturating_sub(1);
    world.player.reset_to_start();
    log::debug!("life lost, {} left", world.lives);
    if world.lives == 0 {
        world.phase = Phase::GameOver;
        events.push(GameEvent::GameOver);
        log::info!("game over: {} scored {}", world.player_name, world.score);
    }
}

fn complete_level(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.level < FINAL_LEVEL {
        world.phase = Phase::LevelComplete;
        events.push(GameEvent::LevelCleared { level: world.level });
        log::info!("level {} cleared", world.level);
    } else {
        world.score += COMPLETION_BONUS;
        world.phase = Phase::GameOver;
        events.push(GameEvent::Victory { bonus: COMPLETION_BONUS });
        log::info!("all levels cleared: {} scored {}", world.player_name, world.score);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
