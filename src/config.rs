/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD, or
/// `~/.config/lanehopper`. Falls back to defaults if the file is missing
/// or incomplete. Gameplay constants are fixed and never read from here.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const MAX_NAME_LEN: usize = 15;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Prefilled into the start screen's name field.
    pub player_name: String,
    /// Driver sleep per frame.
    pub frame_ms: u64,
    pub sound_enabled: bool,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub pause: Vec<String>,
    pub restart: Vec<String>,
    pub menu: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    player_name: String,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_menu")]
    menu: Vec<String>,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }
fn default_true() -> bool { true }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_restart() -> Vec<String> { vec!["Y".into()] }
fn default_menu() -> Vec<String> { vec!["B".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { player_name: String::new(), frame_ms: default_frame_ms() }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: true }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            pause: default_pause(),
            restart: default_restart(),
            menu: default_menu(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from the first `config.toml` found.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let cfg = Self::from_toml(load_toml(&candidate_dirs()));
        log::debug!("config: {cfg:?}");
        cfg
    }

    /// Parse config text. A parse error yields the defaults.
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => Self::from_toml(cfg),
            Err(e) => {
                log::warn!("config.toml parse error, using defaults: {e}");
                Self::default()
            }
        }
    }

    fn from_toml(t: TomlConfig) -> Self {
        let player_name: String = t.general.player_name.trim().chars().take(MAX_NAME_LEN).collect();
        let frame_ms = t.general.frame_ms.clamp(1, 100);
        if frame_ms != t.general.frame_ms {
            log::warn!("frame_ms {} out of range, using {frame_ms}", t.general.frame_ms);
        }
        GameConfig {
            player_name,
            frame_ms,
            sound_enabled: t.sound.enabled,
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
                pause: t.gamepad.pause,
                restart: t.gamepad.restart,
                menu: t.gamepad.menu,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + user config dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. ~/.config/lanehopper
    if let Ok(home) = std::env::var("HOME") {
        let user = PathBuf::from(&home).join(".config/lanehopper");
        if user.is_dir() && !dirs.iter().any(|d| d == &user) {
            dirs.push(user);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml in `search_dirs`; unreadable files are skipped.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for path in search_dirs.iter().map(|d| d.join("config.toml")) {
        if !path.exists() {
            continue;
        }
        match read_toml(&path) {
            Ok(cfg) => return cfg,
            Err(e) => log::warn!("{}: {e}", path.display()),
        }
    }
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Result<TomlConfig, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let cfg = GameConfig::parse("");
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.frame_ms, 16);
        assert!(cfg.sound_enabled);
        assert!(cfg.player_name.is_empty());
        assert_eq!(cfg.gamepad.pause, vec!["Start".to_string()]);
    }

    #[test]
    fn partial_sections() {
        let cfg = GameConfig::parse(
            "[general]\nplayer_name = \"Kim\"\n\n[sound]\nenabled = false\n",
        );
        assert_eq!(cfg.player_name, "Kim");
        assert_eq!(cfg.frame_ms, 16);
        assert!(!cfg.sound_enabled);
    }

    #[test]
    fn long_name_is_truncated() {
        let cfg = GameConfig::parse("[general]\nplayer_name = \"  abcdefghijklmnopqrstu\"\n");
        assert_eq!(cfg.player_name, "abcdefghijklmno");
    }

    #[test]
    fn frame_ms_is_clamped() {
        assert_eq!(GameConfig::parse("[general]\nframe_ms = 0\n").frame_ms, 1);
        assert_eq!(GameConfig::parse("[general]\nframe_ms = 5000\n").frame_ms, 100);
        assert_eq!(GameConfig::parse("[general]\nframe_ms = 33\n").frame_ms, 33);
    }

    #[test]
    fn gamepad_lists() {
        let cfg = GameConfig::parse("[gamepad]\nrestart = [\"X\", \"R1\"]\n");
        assert_eq!(cfg.gamepad.restart, vec!["X".to_string(), "R1".to_string()]);
        assert_eq!(cfg.gamepad.cancel, vec!["Select".to_string()]);
        assert_eq!(cfg.gamepad.menu, vec!["B".to_string()]);

        let cfg = GameConfig::parse("[gamepad]\nmenu = [\"L1\"]\n");
        assert_eq!(cfg.gamepad.menu, vec!["L1".to_string()]);
    }

    #[test]
    fn malformed_text_falls_back() {
        let cfg = GameConfig::parse("[general\nframe_ms = ");
        assert_eq!(cfg, GameConfig::default());
        let cfg = GameConfig::parse("[general]\nframe_ms = \"fast\"\n");
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn missing_dirs_give_defaults() {
        let cfg = GameConfig::from_toml(load_toml(&[PathBuf::from("/nonexistent/lanehopper")]));
        assert_eq!(cfg, GameConfig::default());
    }
}
