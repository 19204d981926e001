//! Playback — the advance controller.
//!
//! Owns a validated `SceneScript`, the current `Position` and a single
//! `Typewriter`. Every position change restarts the typewriter within the same
//! call, so callers never observe a new line paired with a stale prefix.

pub mod typewriter;

use std::time::{Duration, Instant};

use crate::script::ScriptError;
use crate::types::{AssetRef, CharacterRef, Ending, Position, SceneScript, Screen};
use typewriter::Typewriter;

/// Default delay between revealed characters.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(28);

/// Outcome of a single `advance` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The line was still typing and has been revealed in full.
    Skipped,
    NextLine,
    NextScreen,
    /// The final line was acknowledged; the end-of-script latch is now set.
    EndOfScript,
    /// The latch was already set. Nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Playback {
    script: SceneScript,
    position: Position,
    typewriter: Typewriter,
    interval: Duration,
    ended: bool,
    text_visible: bool,
}

impl Playback {
    /// Build a controller positioned on the first line, already typing.
    ///
    /// Fails if the script has no screens or a screen has no text. Character
    /// names are not checked here; see `SceneScript::validate`.
    pub fn new(script: SceneScript, interval: Duration, now: Instant) -> Result<Self, ScriptError> {
        script.validate_structure()?;
        let mut playback = Playback {
            script,
            position: Position::START,
            typewriter: Typewriter::new(),
            interval,
            ended: false,
            text_visible: true,
        };
        playback.restart_line(now);
        Ok(playback)
    }

    /// Move to the next line or screen, or latch the end of the script.
    ///
    /// While the current line is still typing this only fast-forwards it.
    pub fn advance(&mut self, now: Instant) -> Advance {
        if self.ended {
            return Advance::Ignored;
        }
        if self.typewriter.is_typing() {
            self.typewriter.skip();
            return Advance::Skipped;
        }

        let Position { screen, line } = self.position;
        let outcome = if line + 1 < self.screen().text.len() {
            self.position.line += 1;
            Advance::NextLine
        } else if screen + 1 < self.script.screens.len() {
            self.position = Position {
                screen: screen + 1,
                line: 0,
            };
            Advance::NextScreen
        } else {
            self.ended = true;
            log::info!("end of script reached at screen {screen}, line {line}");
            return Advance::EndOfScript;
        };

        log::debug!(
            "{outcome:?}: ({screen}, {line}) -> ({}, {})",
            self.position.screen,
            self.position.line
        );
        self.restart_line(now);
        outcome
    }

    /// Reveal the current line in full. Never sets the end-of-script latch.
    pub fn skip(&mut self) {
        self.typewriter.skip();
    }

    /// Drive the typewriter. Returns `true` when the revealed text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.typewriter.tick(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.typewriter.next_deadline()
    }

    pub fn toggle_visibility(&mut self) {
        self.text_visible = !self.text_visible;
    }

    /// Return to the first line and clear the latch.
    pub fn reset(&mut self, now: Instant) {
        self.position = Position::START;
        self.ended = false;
        self.text_visible = true;
        self.restart_line(now);
    }

    /// Swap in a new script and start it from the beginning.
    ///
    /// On error the current script and position are left untouched.
    pub fn replace_script(&mut self, script: SceneScript, now: Instant) -> Result<(), ScriptError> {
        script.validate_structure()?;
        self.script = script;
        self.reset(now);
        Ok(())
    }

    fn restart_line(&mut self, now: Instant) {
        let Position { screen, line } = self.position;
        let text = &self.script.screens[screen].text[line];
        self.typewriter.start(text, self.interval, now);
    }

    // -----------------------------------------------------------------------
    // Read-only view for the presentation layer
    // -----------------------------------------------------------------------

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn revealed(&self) -> &str {
        self.typewriter.revealed()
    }

    pub fn current_line(&self) -> &str {
        self.typewriter.text()
    }

    pub fn is_typing(&self) -> bool {
        self.typewriter.is_typing()
    }

    pub fn end_of_script_reached(&self) -> bool {
        self.ended
    }

    /// Last line of the last screen, fully revealed.
    pub fn at_final_line(&self) -> bool {
        let last_screen = self.script.screens.len() - 1;
        self.position.screen == last_screen
            && self.position.line == self.screen().text.len() - 1
            && !self.is_typing()
    }

    pub fn text_visible(&self) -> bool {
        self.text_visible
    }

    pub fn screen(&self) -> &Screen {
        &self.script.screens[self.position.screen]
    }

    pub fn background(&self) -> &AssetRef {
        &self.screen().background
    }

    pub fn character(&self) -> Option<&CharacterRef> {
        self.screen().character.as_ref()
    }

    /// Expression of the current character for the current line.
    pub fn expression(&self) -> Option<&str> {
        self.character().map(|c| c.expression(self.position.line))
    }

    pub fn ending(&self) -> &Ending {
        &self.script.ending
    }

    pub fn script(&self) -> &SceneScript {
        &self.script
    }
}
