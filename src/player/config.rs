use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::playback::DEFAULT_INTERVAL;
use crate::script::{AnyCharacter, Cast, CharacterRegistry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,
    /// Character names that can be drawn. `None` accepts any name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,
    #[serde(default)]
    pub key_bindings: KeyBindings,
}

/// Each action accepts any of several bindings, e.g. `["Enter", "Space"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub advance: Vec<String>,
    pub skip: Vec<String>,
    pub toggle_text: Vec<String>,
    pub inventory: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
    pub fullscreen: Vec<String>,
}

fn default_reveal_interval_ms() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}

fn bindings(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            advance: bindings(&["Enter", "Space", "Right"]),
            skip: bindings(&["Tab"]),
            toggle_text: bindings(&["h"]),
            inventory: bindings(&["i"]),
            restart: bindings(&["Ctrl-r"]),
            quit: bindings(&["q", "Esc"]),
            fullscreen: bindings(&["F11"]),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            reveal_interval_ms: default_reveal_interval_ms(),
            cast: None,
            key_bindings: KeyBindings::default(),
        }
    }
}

/// What a key press asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Advance,
    Skip,
    ToggleText,
    ToggleInventory,
    Restart,
    Quit,
    ToggleFullscreen,
}

impl KeyBindings {
    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        let table: [(&[String], Action); 7] = [
            (self.quit.as_slice(), Action::Quit),
            (self.restart.as_slice(), Action::Restart),
            (self.skip.as_slice(), Action::Skip),
            (self.advance.as_slice(), Action::Advance),
            (self.toggle_text.as_slice(), Action::ToggleText),
            (self.inventory.as_slice(), Action::ToggleInventory),
            (self.fullscreen.as_slice(), Action::ToggleFullscreen),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.iter().any(|b| matches_binding(b, event)))
            .map(|(_, action)| action)
    }

    /// First binding of each action, for the hint bar.
    pub fn primary(keys: &[String]) -> &str {
        keys.first().map(String::as_str).unwrap_or("-")
    }
}

impl PlayerConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "invalid player config {} ({e}), using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    /// Registry used to validate character names in scripts.
    pub fn registry(&self) -> Box<dyn CharacterRegistry> {
        match &self.cast {
            Some(names) => Box::new(Cast::new(names.iter().cloned())),
            None => Box::new(AnyCharacter),
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("scene-player");
        path.push("player.json");
        path
    }
}

/// Split a binding string like `"Ctrl-s"` into modifiers and a key code.
fn parse_binding(binding: &str) -> Option<(KeyModifiers, KeyCode)> {
    let (modifiers, key) = if let Some(rest) = binding.strip_prefix("Ctrl-") {
        (KeyModifiers::CONTROL, rest)
    } else if let Some(rest) = binding.strip_prefix("Alt-") {
        (KeyModifiers::ALT, rest)
    } else {
        (KeyModifiers::NONE, binding)
    };

    let code = match key {
        "Right" => KeyCode::Right,
        "Left" => KeyCode::Left,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Enter" => KeyCode::Enter,
        "Esc" => KeyCode::Esc,
        "Space" => KeyCode::Char(' '),
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        s => match s.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
            Some(n) => KeyCode::F(n),
            None => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        },
    };
    Some((modifiers, code))
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
///
/// Ctrl and Alt must match exactly, so a plain `"h"` binding does not fire on
/// Alt-h. Shift is ignored.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    let Some((modifiers, code)) = parse_binding(binding) else {
        return false;
    };
    let held = event.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
    if held != modifiers {
        return false;
    }
    match (code, event.code) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
        (a, b) => a == b,
    }
}
