//! Scene script loading and validation.
//!
//! A script is checked once, before any rendering happens. Whether a character
//! name can actually be drawn is decided by a [`CharacterRegistry`] supplied
//! by the presentation layer; the script itself only carries the names.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::types::SceneScript;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("script has no screens")]
    NoScreens,
    #[error("screen {screen} has no text lines")]
    EmptyScreen { screen: usize },
    #[error("screen {screen} references unknown character {name:?}")]
    UnknownCharacter { screen: usize, name: String },
}

/// Lookup of character names that have a rendering target.
pub trait CharacterRegistry {
    fn contains(&self, name: &str) -> bool;
}

/// Registry that accepts every name. Used when no cast is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyCharacter;

impl CharacterRegistry for AnyCharacter {
    fn contains(&self, _name: &str) -> bool {
        true
    }
}

impl<R: CharacterRegistry + ?Sized> CharacterRegistry for Box<R> {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }
}

/// Explicit set of drawable character names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cast {
    names: BTreeSet<String>,
}

impl Cast {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Cast {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl CharacterRegistry for Cast {
    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl SceneScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a script file. Does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let json = fs::read_to_string(path.as_ref())?;
        let script = Self::from_json(&json)?;
        log::info!(
            "loaded script {} ({} screens, {} lines)",
            path.as_ref().display(),
            script.screens.len(),
            script.line_count()
        );
        Ok(script)
    }

    /// Structural checks only: at least one screen, and every screen has text.
    pub fn validate_structure(&self) -> Result<(), ScriptError> {
        if self.screens.is_empty() {
            return Err(ScriptError::NoScreens);
        }
        if let Some(screen) = self.screens.iter().position(|s| s.text.is_empty()) {
            return Err(ScriptError::EmptyScreen { screen });
        }
        Ok(())
    }

    /// Full validation, including character names against `registry`.
    pub fn validate(&self, registry: &impl CharacterRegistry) -> Result<(), ScriptError> {
        self.validate_structure()?;
        for (screen, s) in self.screens.iter().enumerate() {
            if let Some(character) = &s.character {
                if !registry.contains(&character.name) {
                    return Err(ScriptError::UnknownCharacter {
                        screen,
                        name: character.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
