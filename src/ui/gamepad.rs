/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move (one hop per push)
///   A / Start             →  Confirm
///   Start                 →  Pause
///   Y                     →  Restart
///   B                     →  Menu
///   Select                →  Quit
///
/// Start is shared by Confirm and Pause. While playing it only pauses;
/// on every other screen it only confirms.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::MoveDir;
use crate::sim::world::Phase;
use super::input::Intent;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East  => Some(Btn::B),
            Button::West  => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    pause: Vec<Btn>,
    restart: Vec<Btn>,
    menu: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            cancel:  vec![Btn::Select],
            pause:   vec![Btn::Start],
            restart: vec![Btn::Y],
            menu:    vec![Btn::B],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],

    /// D-pad, indexed like `MoveDir::ALL`.
    dpad: [BtnState; 4],
    /// Left stick as four digital directions.
    stick: [BtnState; 4],
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

fn dir_index(dir: MoveDir) -> usize {
    match dir {
        MoveDir::Up => 0,
        MoveDir::Down => 1,
        MoveDir::Left => 2,
        MoveDir::Right => 3,
    }
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [BtnState::default(); 4],
            stick: [BtnState::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Lists with no known names keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter()
                .filter_map(|s| {
                    let b = Btn::from_name(s);
                    if b.is_none() { log::warn!("unknown gamepad button {s:?}"); }
                    b
                })
                .collect()
        }
        let map = &mut self.action_map;
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { map.confirm = cf; }
        let ca = parse_list(&cfg.cancel);
        if !ca.is_empty() { map.cancel = ca; }
        let pa = parse_list(&cfg.pause);
        if !pa.is_empty() { map.pause = pa; }
        let rs = parse_list(&cfg.restart);
        if !rs.is_empty() { map.restart = rs; }
        let mn = parse_list(&cfg.menu);
        if !mn.is_empty() { map.menu = mn; }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    self.connected = true;
                    log::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    log::info!("gamepad disconnected");
                }
                _ => {}
            }
        }

        self.update_stick();
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dir = match gilrs_btn {
            Button::DPadUp    => Some(MoveDir::Up),
            Button::DPadDown  => Some(MoveDir::Down),
            Button::DPadLeft  => Some(MoveDir::Left),
            Button::DPadRight => Some(MoveDir::Right),
            _ => None,
        };
        let state = match dir {
            Some(d) => &mut self.dpad[dir_index(d)],
            None => match Btn::from_gilrs(gilrs_btn) {
                Some(b) => &mut self.buttons[b as usize],
                None => return,
            },
        };
        if held && !state.held {
            state.just_pressed = true;
        }
        state.held = held;
    }

    /// Derive the stick's digital directions, with edges, from its axes.
    fn update_stick(&mut self) {
        let now = [
            self.stick_y > STICK_DEADZONE,
            self.stick_y < -STICK_DEADZONE,
            self.stick_x < -STICK_DEADZONE,
            self.stick_x > STICK_DEADZONE,
        ];
        for (s, held) in self.stick.iter_mut().zip(now) {
            if held && !s.held {
                s.just_pressed = true;
            }
            s.held = held;
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    /// Direction pushed this frame, d-pad first. Holding does not repeat.
    pub fn move_pressed(&self) -> Option<MoveDir> {
        MoveDir::ALL.into_iter().find(|&d| {
            let i = dir_index(d);
            self.dpad[i].just_pressed || self.stick[i].just_pressed
        })
    }

    /// Intents for this frame: a move first, then mapped buttons.
    /// Pause is only produced while `phase` is Playing and Confirm only
    /// outside it, so a button bound to both yields one intent.
    pub fn intents(&self, phase: Phase) -> Vec<Intent> {
        let mut out = Vec::new();
        if let Some(d) = self.move_pressed() {
            out.push(Intent::Move(d));
        }
        let map = &self.action_map;
        let playing = phase == Phase::Playing;
        if !playing && self.any_just_pressed(&map.confirm) { out.push(Intent::Confirm); }
        if playing && self.any_just_pressed(&map.pause) { out.push(Intent::Pause); }
        if self.any_just_pressed(&map.restart) { out.push(Intent::Restart); }
        if self.any_just_pressed(&map.menu) { out.push(Intent::Menu); }
        if self.any_just_pressed(&map.cancel) { out.push(Intent::Quit); }
        out
    }

    /// Simulate a fresh press of `b`.
    #[cfg(test)]
    pub fn press(&mut self, b: Btn) {
        self.buttons[b as usize] = BtnState { held: true, just_pressed: true };
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.just_pressed = false;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            *b = BtnState::default();
        }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("South"), Some(Btn::A));
        assert_eq!(Btn::from_name("lb"), Some(Btn::L1));
        assert_eq!(Btn::from_name("Turbo"), None);
    }

    #[test]
    fn config_overrides_mapping() {
        let mut pad = GamepadState::new();
        pad.load_button_config(&GamepadConfig {
            confirm: vec!["B".into()],
            cancel: vec!["bogus".into()],
            pause: vec![],
            restart: vec!["X".into(), "R1".into()],
            menu: vec!["L1".into()],
        });
        assert_eq!(pad.action_map.confirm, vec![Btn::B]);
        assert_eq!(pad.action_map.cancel, vec![Btn::Select]);
        assert_eq!(pad.action_map.pause, vec![Btn::Start]);
        assert_eq!(pad.action_map.restart, vec![Btn::X, Btn::R1]);
        assert_eq!(pad.action_map.menu, vec![Btn::L1]);
    }

    #[test]
    fn buttons_map_to_intents() {
        let mut pad = GamepadState::new();
        pad.press(Btn::Y);
        pad.press(Btn::Select);
        assert_eq!(pad.intents(Phase::GameOver), vec![Intent::Restart, Intent::Quit]);

        pad.clear_just_pressed();
        assert!(pad.intents(Phase::GameOver).is_empty());

        pad.press(Btn::B);
        assert_eq!(pad.intents(Phase::GameOver), vec![Intent::Menu]);
    }

    #[test]
    fn start_button_confirms_or_pauses_by_screen() {
        let mut pad = GamepadState::new();
        pad.press(Btn::Start);
        assert_eq!(pad.intents(Phase::LevelComplete), vec![Intent::Confirm]);
        assert_eq!(pad.intents(Phase::Start), vec![Intent::Confirm]);
        assert_eq!(pad.intents(Phase::GameOver), vec![Intent::Confirm]);
        assert_eq!(pad.intents(Phase::Playing), vec![Intent::Pause]);

        pad.clear_just_pressed();
        pad.press(Btn::A);
        assert!(pad.intents(Phase::Playing).is_empty());
    }

    #[test]
    fn stick_push_is_edge_triggered() {
        let mut pad = GamepadState::new();
        pad.stick_x = -0.9;
        pad.update_stick();
        assert_eq!(pad.move_pressed(), Some(MoveDir::Left));

        pad.clear_just_pressed();
        pad.update_stick();
        assert_eq!(pad.move_pressed(), None, "held stick does not repeat");

        pad.stick_x = 0.0;
        pad.stick_y = 0.8;
        pad.clear_just_pressed();
        pad.update_stick();
        assert_eq!(pad.intents(Phase::Playing), vec![Intent::Move(MoveDir::Up)]);
    }

    #[test]
    fn small_stick_drift_is_ignored() {
        let mut pad = GamepadState::new();
        pad.stick_x = 0.3;
        pad.stick_y = -0.2;
        pad.update_stick();
        assert_eq!(pad.move_pressed(), None);
    }
}
