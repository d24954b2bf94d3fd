/// Keyboard input: terminal events decoded into intents.
///
/// Every hop is one discrete press, so only Press/Repeat events count and
/// no held-key state is tracked.
///
///   Arrows / WASD  →  Move          P      →  Pause
///   Enter          →  Confirm       R      →  Restart
///   M              →  Menu          Esc / Ctrl+C  →  Quit
///
/// While the name field is focused, printable characters and Backspace
/// edit the name instead; Enter and Esc keep their meaning.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::MAX_NAME_LEN;
use crate::domain::entity::MoveDir;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Move(MoveDir),
    Pause,
    Confirm,
    Restart,
    Menu,
    Quit,
    /// Name entry: append a character.
    Type(char),
    /// Name entry: delete the last character.
    Erase,
}

pub struct InputState {
    /// Key events collected during the most recent `drain_events` call.
    pub raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { raw_events: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    self.raw_events.push(key);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal read failed: {e}");
                    break;
                }
            }
        }
    }
}

/// Map one key event to an intent. `typing` selects name-entry decoding
/// and must reflect the screen as of this key, not the start of the frame.
pub fn decode_key(key: &KeyEvent, typing: bool) -> Option<Intent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return Some(Intent::Quit);
    }

    match key.code {
        KeyCode::Esc => return Some(Intent::Quit),
        KeyCode::Enter => return Some(Intent::Confirm),
        _ => {}
    }

    if typing {
        return match key.code {
            KeyCode::Backspace => Some(Intent::Erase),
            KeyCode::Char(c) if !ctrl && !c.is_control() => Some(Intent::Type(c)),
            _ => None,
        };
    }

    let intent = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Intent::Move(MoveDir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Intent::Move(MoveDir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Intent::Move(MoveDir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Intent::Move(MoveDir::Right),
        KeyCode::Char('p') | KeyCode::Char('P') => Intent::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') => Intent::Restart,
        KeyCode::Char('m') | KeyCode::Char('M') => Intent::Menu,
        _ => return None,
    };
    Some(intent)
}

/// Apply a name-entry intent to `name`. Returns true if the name changed.
pub fn edit_name(name: &mut String, intent: Intent) -> bool {
    match intent {
        Intent::Type(c) if name.chars().count() < MAX_NAME_LEN => {
            name.push(c);
            true
        }
        Intent::Erase => name.pop().is_some(),
        _ => false,
    }
}
