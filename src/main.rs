/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use crossterm::event::KeyEvent;
use ui::input::{self, InputState, Intent};
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

/// Frames a status message stays on screen.
const MESSAGE_FRAMES: u32 = 90;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();
    let mut world = WorldState::new();
    let mut name_buf = config.player_name.clone();

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound_enabled { SoundEngine::new() } else { None };

    let result = game_loop(&mut world, &mut name_buf, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Lane Hopper, {}!", world.player_name);
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    name_buf: &mut String,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let clock = Instant::now();
    let frame = Duration::from_millis(config.frame_ms);

    loop {
        kb.drain_events();
        gp.update();

        let phase = world.phase;
        let Some(mut events) = apply_keys(world, name_buf, &kb.raw_events) else {
            return Ok(());
        };
        for intent in gp.intents(phase) {
            match apply_intent(world, name_buf, intent) {
                Some(ev) => events.extend(ev),
                None => return Ok(()),
            }
        }

        let now_ms = clock.elapsed().as_millis() as u64;
        events.extend(step::tick(world, now_ms));

        report_events(world, sound, &events);
        world.tick_message();

        renderer.render(world, name_buf)?;
        std::thread::sleep(frame);
    }
}

/// Decode and apply key events in arrival order. Each key is decoded
/// against the screen left by the keys before it, so keys after the one
/// that starts a game steer the player instead of editing the name.
/// Returns `None` when the player asked to quit.
fn apply_keys(world: &mut WorldState, name_buf: &mut String, keys: &[KeyEvent]) -> Option<Vec<GameEvent>> {
    let mut events = Vec::new();
    for key in keys {
        let typing = world.phase == Phase::Start;
        if let Some(intent) = input::decode_key(key, typing) {
            events.extend(apply_intent(world, name_buf, intent)?);
        }
    }
    Some(events)
}

/// Route one intent to the state machine for the current screen.
/// Returns `None` when the player asked to quit.
fn apply_intent(world: &mut WorldState, name_buf: &mut String, intent: Intent) -> Option<Vec<GameEvent>> {
    if intent == Intent::Quit {
        return None;
    }

    let mut events = Vec::new();
    match (world.phase, intent) {
        // ── Start screen ──
        (Phase::Start, Intent::Confirm) => {
            if name_buf.trim().is_empty() {
                world.set_message("Please enter a name", MESSAGE_FRAMES);
            } else {
                step::start_game(world, name_buf);
                world.set_message("Go!", MESSAGE_FRAMES);
            }
        }
        (Phase::Start, edit) => {
            input::edit_name(name_buf, edit);
        }

        // ── Playing ──
        (Phase::Playing, Intent::Move(dir)) => events = step::move_player(world, dir),
        (Phase::Playing, Intent::Pause) => step::toggle_pause(world),

        // ── Between levels ──
        (Phase::LevelComplete, Intent::Confirm) => {
            step::next_level(world);
            world.set_message(&format!("Level {}", world.level), MESSAGE_FRAMES);
        }

        // ── Game over ──
        (Phase::GameOver, Intent::Restart) => step::restart(world),
        (Phase::GameOver, Intent::Menu) => step::return_to_menu(world),

        _ => {}
    }
    Some(events)
}

/// Status messages and sound for this frame's events.
fn report_events(world: &mut WorldState, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for ev in events {
        let msg = match ev {
            GameEvent::Hopped { .. } => continue,
            GameEvent::Drowned => format!("Splash! {} lives left", world.lives),
            GameEvent::Crushed => format!("Squashed! {} lives left", world.lives),
            GameEvent::GoalReached { points, .. } => {
                format!("Home! +{points}  ({}/{})", world.goals_filled(), world.goals.len())
            }
            GameEvent::BoundaryBonus { points } => format!("Bonus +{points}"),
            GameEvent::LevelCleared { level } => format!("Level {level} clear! Press ENTER"),
            GameEvent::GameOver => "Game over".to_string(),
            GameEvent::Victory { bonus } => format!("You win! Completion bonus +{bonus}"),
        };
        world.set_message(&msg, MESSAGE_FRAMES);
    }

    if let (Some(sfx), Some(effect)) = (sound, sound::effect_for_batch(events)) {
        sfx.play(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::entity::MoveDir;

    fn started(name: &str) -> (WorldState, String) {
        let mut w = WorldState::new();
        let mut buf = name.to_string();
        apply_intent(&mut w, &mut buf, Intent::Confirm);
        (w, buf)
    }

    #[test]
    fn quit_from_any_screen() {
        let mut w = WorldState::new();
        let mut buf = String::new();
        assert!(apply_intent(&mut w, &mut buf, Intent::Quit).is_none());
        let (mut w, mut buf) = started("A");
        assert!(apply_intent(&mut w, &mut buf, Intent::Quit).is_none());
    }

    #[test]
    fn start_needs_a_name() {
        let (w, _) = started("  ");
        assert_eq!(w.phase, Phase::Start);
        assert!(!w.message.is_empty());

        let (w, _) = started("Kit");
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.player_name, "Kit");
    }

    #[test]
    fn typing_on_start_screen_edits_name() {
        let mut w = WorldState::new();
        let mut buf = String::new();
        for i in [Intent::Type('p'), Intent::Type('x'), Intent::Erase, Intent::Type('q')] {
            apply_intent(&mut w, &mut buf, i);
        }
        assert_eq!(buf, "pq");
        assert_eq!(w.phase, Phase::Start);
    }

    #[test]
    fn moves_and_pause_route_while_playing() {
        let (mut w, mut buf) = started("A");
        let ev = apply_intent(&mut w, &mut buf, Intent::Move(MoveDir::Up));
        assert_eq!(ev, Some(vec![GameEvent::Hopped { col: 5, row: 8 }]));

        apply_intent(&mut w, &mut buf, Intent::Pause);
        assert!(w.paused);
        let ev = apply_intent(&mut w, &mut buf, Intent::Move(MoveDir::Up));
        assert_eq!(ev, Some(vec![]));
        apply_intent(&mut w, &mut buf, Intent::Pause);
        assert!(!w.paused);
    }

    #[test]
    fn restart_keys_ignored_while_playing() {
        let (mut w, mut buf) = started("A");
        w.score = 70;
        apply_intent(&mut w, &mut buf, Intent::Restart);
        apply_intent(&mut w, &mut buf, Intent::Menu);
        assert_eq!((w.phase, w.score), (Phase::Playing, 70));
    }

    #[test]
    fn game_over_menu_and_restart() {
        let (mut w, mut buf) = started("A");
        w.lives = 1;
        w.hazards.clear();
        w.platforms.clear();
        w.player.place(2, 4);
        apply_intent(&mut w, &mut buf, Intent::Move(MoveDir::Up));
        assert_eq!(w.phase, Phase::GameOver);

        apply_intent(&mut w, &mut buf, Intent::Restart);
        assert_eq!((w.phase, w.lives), (Phase::Playing, 3));

        w.lives = 1;
        w.player.place(2, 4);
        apply_intent(&mut w, &mut buf, Intent::Move(MoveDir::Up));
        apply_intent(&mut w, &mut buf, Intent::Menu);
        assert_eq!(w.phase, Phase::Start);
    }

    #[test]
    fn confirm_advances_level() {
        let (mut w, mut buf) = started("A");
        w.phase = Phase::LevelComplete;
        apply_intent(&mut w, &mut buf, Intent::Confirm);
        assert_eq!((w.phase, w.level), (Phase::Playing, 2));
    }

    #[test]
    fn events_become_messages() {
        let (mut w, _) = started("A");
        report_events(&mut w, None, &[GameEvent::Hopped { col: 5, row: 8 }]);
        assert_eq!(w.message, "Go!");
        report_events(&mut w, None, &[GameEvent::BoundaryBonus { points: 50 }]);
        assert_eq!(w.message, "Bonus +50");
        assert_eq!(w.message_timer, MESSAGE_FRAMES);
    }

    #[test]
    fn keys_after_start_steer_instead_of_typing() {
        use crossterm::event::{KeyCode, KeyModifiers};
        let keys: Vec<KeyEvent> = [KeyCode::Char('A'), KeyCode::Enter, KeyCode::Up]
            .into_iter()
            .map(|c| KeyEvent::new(c, KeyModifiers::NONE))
            .collect();

        let mut w = WorldState::new();
        let mut buf = String::new();
        let ev = apply_keys(&mut w, &mut buf, &keys);
        assert_eq!(ev, Some(vec![GameEvent::Hopped { col: 5, row: 8 }]));
        assert_eq!(buf, "A");
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!((w.player.col, w.player.row), (5, 8));

        let esc = [KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)];
        assert!(apply_keys(&mut w, &mut buf, &esc).is_none());
    }

    #[test]
    fn gamepad_start_never_begins_paused() {
        let mut pad = GamepadState::new();
        pad.load_button_config(&GameConfig::default().gamepad);
        pad.press(ui::gamepad::Btn::Start);

        let (mut w, mut buf) = started("A");
        w.phase = Phase::LevelComplete;
        for i in pad.intents(w.phase) {
            apply_intent(&mut w, &mut buf, i);
        }
        assert_eq!((w.phase, w.level), (Phase::Playing, 2));
        assert!(!w.paused);

        let mut w = WorldState::new();
        let mut buf = "Kit".to_string();
        for i in pad.intents(w.phase) {
            apply_intent(&mut w, &mut buf, i);
        }
        assert_eq!(w.phase, Phase::Playing);
        assert!(!w.paused);
    }
}
