/// WorldState: the complete, explicitly owned session.
///
/// One instance per process, created by the driver and passed by `&mut`
/// into every state-machine call in `sim::step`. Presentation code only
/// ever receives `&WorldState`.
///
/// ## Ownership
///   - `player`: grid position + derived hit rect
///   - `hazards`: replaced wholesale by the level generator
///   - `platforms`: replaced wholesale by the level generator
///   - `goals`: fixed 5 slots, `filled` reset per level attempt

use crate::domain::constants::{GOAL_COUNT, GOAL_FIRST_X, GOAL_STRIDE, GOAL_Y, INITIAL_LIVES};
use crate::domain::entity::{GoalSlot, Obstacle, Player};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Start,
    Playing,
    GameOver,
    LevelComplete,
}

/// Session summary for the HUD.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudInfo {
    pub player_name: String,
    pub level: u32,
    pub lives: u32,
    pub score: u32,
    pub phase: Phase,
    pub paused: bool,
}

pub struct WorldState {
    // ── Entities ──
    pub player: Player,
    pub hazards: Vec<Obstacle>,
    pub platforms: Vec<Obstacle>,
    pub goals: Vec<GoalSlot>,

    // ── Session ──
    pub phase: Phase,
    pub level: u32,
    pub lives: u32,
    pub score: u32,
    pub paused: bool,
    pub player_name: String,

    // ── Pacing ──
    /// Clock value (ms) of the last fired tick.
    pub last_tick_ms: u64,
    pub tick_interval_ms: u64,
    /// Number of fired ticks since process start.
    pub tick: u64,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl WorldState {
    pub fn new() -> Self {
        WorldState {
            player: Player::new(),
            hazards: vec![],
            platforms: vec![],
            goals: new_goal_slots(),
            phase: Phase::Start,
            level: 1,
            lives: INITIAL_LIVES,
            score: 0,
            paused: false,
            player_name: String::from("Player"),
            last_tick_ms: 0,
            tick_interval_ms: super::level::tick_interval(1),
            tick: 0,
            message: String::new(),
            message_timer: 0,
        }
    }

    pub fn hud(&self) -> HudInfo {
        HudInfo {
            player_name: self.player_name.clone(),
            level: self.level,
            lives: self.lives,
            score: self.score,
            phase: self.phase,
            paused: self.paused,
        }
    }

    pub fn goals_filled(&self) -> usize {
        self.goals.iter().filter(|g| g.filled).count()
    }

    pub fn all_goals_filled(&self) -> bool {
        self.goals.iter().all(|g| g.filled)
    }

    /// Game ended by clearing the final level rather than by running out of lives.
    pub fn is_victory(&self) -> bool {
        self.phase == Phase::GameOver && self.lives > 0
    }

    /// Every obstacle, hazards first.
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.hazards.iter().chain(self.platforms.iter())
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the message timer; clears the message when it expires.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

fn new_goal_slots() -> Vec<GoalSlot> {
    (0..GOAL_COUNT)
        .map(|i| GoalSlot::new(GOAL_FIRST_X + i as i32 * GOAL_STRIDE, GOAL_Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_world_is_on_start_screen() {
        let w = WorldState::new();
        assert_eq!(w.phase, Phase::Start);
        assert_eq!(w.goals.len(), 5);
        assert_eq!(w.goals_filled(), 0);
        assert!(w.obstacles().next().is_none());
        assert!(!w.is_victory());
    }

    #[test]
    fn goal_slots_layout() {
        let w = WorldState::new();
        let xs: Vec<i32> = w.goals.iter().map(|g| g.rect.x).collect();
        assert_eq!(xs, vec![40, 160, 280, 400, 520]);
        assert!(w.goals.iter().all(|g| g.rect.y == 10));
    }

    #[test]
    fn hud_reflects_session() {
        let mut w = WorldState::new();
        w.score = 350;
        w.lives = 2;
        w.player_name = "Ann".into();
        let hud = w.hud();
        assert_eq!(hud.player_name, "Ann");
        assert_eq!((hud.level, hud.lives, hud.score), (1, 2, 350));
        assert_eq!(hud.phase, Phase::Start);
        assert!(!hud.paused);
    }

    #[test]
    fn message_expires() {
        let mut w = WorldState::new();
        w.set_message("hi", 2);
        w.tick_message();
        assert_eq!(w.message, "hi");
        w.tick_message();
        assert!(w.message.is_empty());
    }
}
