//! Shared data types for the scene player.
//!
//! This module defines the scene script contract:
//! - Author → Player (file): `SceneScript` containing `Screen`s
//! - Playback → Presentation (in-memory): `Position`
//!
//! Asset and character references are opaque here. Resolving them to actual
//! media is the presentation layer's job.

use serde::{Deserialize, Serialize};

/// Expression used for lines that have no explicit entry in `expressions`.
pub const DEFAULT_EXPRESSION: &str = "normal";

// ---------------------------------------------------------------------------
// Scene script (serialized, authored externally)
// ---------------------------------------------------------------------------

/// Opaque identifier for a background image or other media.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        AssetRef(s.to_string())
    }
}

/// Where the presentation layer places a character on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Left,
    #[default]
    Center,
    Right,
}

fn is_center(s: &Stage) -> bool {
    *s == Stage::Center
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRef {
    pub name: String,
    /// Expression per line index; missing entries fall back to
    /// [`DEFAULT_EXPRESSION`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expressions: Vec<String>,
    #[serde(default, skip_serializing_if = "is_center")]
    pub stage: Stage,
}

impl CharacterRef {
    pub fn new(name: impl Into<String>) -> Self {
        CharacterRef {
            name: name.into(),
            expressions: Vec::new(),
            stage: Stage::default(),
        }
    }

    pub fn expression(&self, line: usize) -> &str {
        self.expressions
            .get(line)
            .map(String::as_str)
            .unwrap_or(DEFAULT_EXPRESSION)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub background: AssetRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<CharacterRef>,
    pub text: Vec<String>,
    /// Fragment ids awarded when playback enters this screen.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<String>,
}

impl Screen {
    pub fn new(background: impl Into<String>, text: &[&str]) -> Self {
        Screen {
            background: AssetRef(background.into()),
            character: None,
            text: text.iter().map(|t| t.to_string()).collect(),
            fragments: Vec::new(),
        }
    }

    pub fn with_character(mut self, character: CharacterRef) -> Self {
        self.character = Some(character);
        self
    }
}

fn default_message() -> String {
    "Chapter Complete".into()
}

fn default_action() -> String {
    "Continue".into()
}

/// Call-to-action shown once the end-of-script latch is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    #[serde(default = "default_message")]
    pub message: String,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Default for Ending {
    fn default() -> Self {
        Ending {
            message: default_message(),
            action: default_action(),
            next: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub screens: Vec<Screen>,
    #[serde(default)]
    pub ending: Ending,
}

impl SceneScript {
    pub fn new(screens: Vec<Screen>) -> Self {
        SceneScript {
            title: None,
            screens,
            ending: Ending::default(),
        }
    }

    /// Total number of dialogue lines across all screens.
    pub fn line_count(&self) -> usize {
        self.screens.iter().map(|s| s.text.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Playback → Presentation boundary (in-memory only)
// ---------------------------------------------------------------------------

/// Index of the current line within the script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub screen: usize,
    pub line: usize,
}

impl Position {
    pub const START: Position = Position { screen: 0, line: 0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_falls_back_to_normal() {
        let mut kai = CharacterRef::new("kai");
        kai.expressions = vec!["worried".into()];
        assert_eq!(kai.expression(0), "worried");
        assert_eq!(kai.expression(1), DEFAULT_EXPRESSION);
    }

    #[test]
    fn parses_minimal_script_with_defaults() {
        let json = r#"{
            "screens": [
                { "background": "bg1.webp", "text": ["Hello"] },
                {
                    "background": "bg2.webp",
                    "character": { "name": "airi", "stage": "left" },
                    "text": ["Papa...", "I'm here..."]
                }
            ]
        }"#;
        let script: SceneScript = serde_json::from_str(json).unwrap();
        assert_eq!(script.screens.len(), 2);
        assert_eq!(script.line_count(), 3);
        assert_eq!(script.ending, Ending::default());

        let airi = script.screens[1].character.as_ref().unwrap();
        assert_eq!(airi.stage, Stage::Left);
        assert_eq!(airi.expression(1), "normal");
        assert_eq!(script.screens[0].background.as_str(), "bg1.webp");
    }

    #[test]
    fn ending_fields_default_individually() {
        let ending: Ending = serde_json::from_str(r#"{ "next": "chapter2.json" }"#).unwrap();
        assert_eq!(ending.message, "Chapter Complete");
        assert_eq!(ending.action, "Continue");
        assert_eq!(ending.next.as_deref(), Some("chapter2.json"));
    }
}
