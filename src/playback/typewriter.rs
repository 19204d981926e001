//! Typewriter — reveals one line of text a character at a time.
//!
//! The pending tick is a single `Option<Instant>`. Starting, skipping and
//! cancelling all replace or clear it in place, so a renderer never holds
//! more than one live timer. Time is passed in by the caller; the renderer
//! itself never sleeps or reads the clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset of the end of the revealed prefix. Always on a char boundary.
    revealed: usize,
    interval: Duration,
    next_tick: Option<Instant>,
}

impl Default for Typewriter {
    fn default() -> Self {
        Typewriter {
            text: String::new(),
            revealed: 0,
            interval: Duration::ZERO,
            next_tick: None,
        }
    }
}

impl Typewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin revealing `text` from an empty prefix, dropping any reveal
    /// already in flight.
    pub fn start(&mut self, text: &str, interval: Duration, now: Instant) {
        self.cancel();
        self.text.clear();
        self.text.push_str(text);
        self.revealed = 0;
        self.interval = interval;
        if !self.text.is_empty() {
            self.next_tick = Some(now + interval);
        }
    }

    /// Reveal the next character if the pending tick is due.
    ///
    /// Returns `true` when the revealed prefix changed. At most one character
    /// is revealed per call, and the following tick is scheduled one interval
    /// after `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_tick else {
            return false;
        };
        if now < due {
            return false;
        }

        if let Some(ch) = self.text[self.revealed..].chars().next() {
            self.revealed += ch.len_utf8();
        }
        self.next_tick = if self.revealed < self.text.len() {
            Some(now + self.interval)
        } else {
            None
        };
        true
    }

    /// Reveal the whole line immediately. No-op once complete.
    pub fn skip(&mut self) {
        self.next_tick = None;
        self.revealed = self.text.len();
    }

    /// Stop revealing without completing the line.
    pub fn cancel(&mut self) {
        self.next_tick = None;
    }

    pub fn is_typing(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn revealed(&self) -> &str {
        &self.text[..self.revealed]
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
