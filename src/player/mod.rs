//! Player — the terminal front end.
//!
//! Feeds key presses, clicks and typewriter deadlines into a `Playback` and
//! draws whatever it exposes. The player makes no sequencing decisions of its
//! own; it only maps input to controller calls and state to terminal cells.

pub mod config;
pub mod layout;

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::playback::{Advance, Playback};
use crate::store::FragmentStore;
use config::{Action, KeyBindings, PlayerConfig};
use layout::{wrap, Layout};

const MIN_WIDTH: u16 = 30;
const MIN_HEIGHT: u16 = 12;
const TYPING_CURSOR: char = '▌';

/// What the event loop should do after an input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Only the text box changed.
    RedrawText,
    Redraw,
    ToggleFullscreen,
    Quit,
}

pub struct Player {
    playback: Playback,
    store: FragmentStore,
    config: PlayerConfig,
    fullscreen: bool,
}

impl Player {
    pub fn new(playback: Playback, store: FragmentStore, config: PlayerConfig) -> Self {
        let mut player = Self {
            playback,
            store,
            config,
            fullscreen: false,
        };
        player.collect_fragments();
        player
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    /// Play the script in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < MIN_WIDTH || term_h < MIN_HEIGHT {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_WIDTH,
                MIN_HEIGHT,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    /// Apply one input action to playback and the fragment store.
    pub fn handle(&mut self, action: Action, now: Instant) -> Flow {
        match action {
            Action::Quit => Flow::Quit,
            Action::ToggleFullscreen => Flow::ToggleFullscreen,
            Action::Advance => match self.playback.advance(now) {
                Advance::Skipped => Flow::RedrawText,
                // The character label shows a per-line expression.
                Advance::NextLine if self.playback.character().is_some() => Flow::Redraw,
                Advance::NextLine => Flow::RedrawText,
                Advance::NextScreen => {
                    self.collect_fragments();
                    Flow::Redraw
                }
                Advance::EndOfScript => Flow::Redraw,
                Advance::Ignored => Flow::Continue,
            },
            Action::Skip => {
                if self.playback.is_typing() {
                    self.playback.skip();
                    Flow::RedrawText
                } else {
                    Flow::Continue
                }
            }
            Action::ToggleText => {
                self.playback.toggle_visibility();
                Flow::Redraw
            }
            Action::ToggleInventory => {
                self.store.toggle_inventory();
                Flow::Redraw
            }
            Action::Restart => {
                self.playback.reset(now);
                self.collect_fragments();
                Flow::Redraw
            }
        }
    }

    fn collect_fragments(&mut self) {
        for id in &self.playback.screen().fragments {
            self.store.add_fragment(id);
        }
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.render_full(stdout)?;

        loop {
            // The typewriter deadline is the only timed wake-up.
            let ready = match self.playback.next_deadline() {
                Some(due) => event::poll(due.saturating_duration_since(Instant::now()))?,
                None => true,
            };

            let flow = if ready {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match self.config.key_bindings.action_for(&key) {
                            Some(action) => self.handle(action, Instant::now()),
                            None => Flow::Continue,
                        }
                    }
                    Event::Mouse(mouse)
                        if mouse.kind == MouseEventKind::Down(MouseButton::Left) =>
                    {
                        // Clicks are blocked once the ending is on screen.
                        if self.playback.end_of_script_reached() {
                            Flow::Continue
                        } else {
                            self.handle(Action::Advance, Instant::now())
                        }
                    }
                    Event::Resize(_, _) => Flow::Redraw,
                    _ => Flow::Continue,
                }
            } else if self.playback.tick(Instant::now()) {
                Flow::RedrawText
            } else {
                Flow::Continue
            };

            match flow {
                Flow::Continue => {}
                Flow::RedrawText => self.render_text_box(stdout)?,
                Flow::Redraw => self.render_full(stdout)?,
                Flow::ToggleFullscreen => {
                    self.fullscreen = !self.fullscreen;
                    if self.fullscreen {
                        stdout.write_all(b"\x1b[10;1t")?;
                    } else {
                        stdout.write_all(b"\x1b[10;0t")?;
                    }
                    stdout.flush()?;
                    self.render_full(stdout)?;
                }
                Flow::Quit => break,
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn layout() -> Result<Layout> {
        let (w, h) = terminal::size()?;
        Ok(Layout::compute(w, h))
    }

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        let layout = Self::layout()?;
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;

        self.render_menubar(stdout, &layout)?;
        self.render_stage(stdout, &layout)?;
        self.queue_text_box(stdout, &layout)?;
        if self.store.show_inventory() {
            self.render_inventory(stdout, &layout)?;
        }
        if self.playback.end_of_script_reached() {
            self.render_ending(stdout, &layout)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn render_text_box(&self, stdout: &mut io::Stdout) -> Result<()> {
        // Overlays sit on top of the text box and must be redrawn with it.
        if self.store.show_inventory() || self.playback.end_of_script_reached() {
            return self.render_full(stdout);
        }
        let layout = Self::layout()?;
        self.queue_text_box(stdout, &layout)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_menubar(&self, stdout: &mut io::Stdout, layout: &Layout) -> Result<()> {
        let kb = &self.config.key_bindings;
        let hints = [
            format!("[{}] next", KeyBindings::primary(&kb.advance)),
            format!("[{}] skip", KeyBindings::primary(&kb.skip)),
            format!("[{}] text", KeyBindings::primary(&kb.toggle_text)),
            format!("[{}] fragments", KeyBindings::primary(&kb.inventory)),
            format!("[{}] quit", KeyBindings::primary(&kb.quit)),
        ];
        // Compact terminals only get the first two hints.
        let shown = if layout.compact { 2 } else { hints.len() };

        queue!(stdout, cursor::MoveTo(0, layout.menu_y), style::Print(" "))?;
        for (i, hint) in hints.iter().take(shown).enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_hint(stdout, hint)?;
        }

        let counter = format!("Fragments: {} ", self.store.len());
        let x = layout.term_width.saturating_sub(counter.chars().count() as u16);
        queue!(
            stdout,
            cursor::MoveTo(x, layout.menu_y),
            style::SetForegroundColor(style::Color::Cyan),
            style::Print(counter),
            style::ResetColor,
        )?;
        Ok(())
    }

    fn render_stage(&self, stdout: &mut io::Stdout, layout: &Layout) -> Result<()> {
        let pos = self.playback.position();
        let mut header = self.playback.background().as_str().to_string();
        if let Some(title) = &self.playback.script().title {
            header = format!("{title} · {header}");
        }
        let screens = self.playback.script().screens.len();
        queue!(
            stdout,
            cursor::MoveTo(2, layout.stage_y + 1),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(format!("{header}  [{}/{}]", pos.screen + 1, screens)),
            style::SetAttribute(style::Attribute::Reset),
        )?;

        if let (Some(character), Some(expression)) =
            (self.playback.character(), self.playback.expression())
        {
            let label = format!(" {} ({expression}) ", character.name);
            let width = label.chars().count() as u16 + 2;
            let x = layout.stage_x(character.stage, width);
            let y = (layout.stage_y + layout.stage_height).saturating_sub(4);
            draw_frame(stdout, x, y, width, 3)?;
            queue!(
                stdout,
                cursor::MoveTo(x + 1, y + 1),
                style::SetAttribute(style::Attribute::Bold),
                style::Print(label),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
        Ok(())
    }

    fn queue_text_box(&self, stdout: &mut io::Stdout, layout: &Layout) -> Result<()> {
        for row in 0..layout.text_height {
            queue!(
                stdout,
                cursor::MoveTo(layout.text_x, layout.text_y + row),
                style::Print(" ".repeat(layout.text_width as usize)),
            )?;
        }
        if !self.playback.text_visible() {
            return Ok(());
        }

        draw_frame(stdout, layout.text_x, layout.text_y, layout.text_width, layout.text_height)?;

        let mut text = self.playback.revealed().to_string();
        if self.playback.is_typing() {
            text.push(TYPING_CURSOR);
        }
        let lines = wrap(&text, layout.inner_text_width());
        // Keep the tail visible when a line overflows the box.
        let skip = lines.len().saturating_sub(layout.inner_text_rows());
        for (row, line) in lines.iter().skip(skip).enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(layout.text_x + 2, layout.text_y + 1 + row as u16),
                style::Print(line),
            )?;
        }
        Ok(())
    }

    fn render_inventory(&self, stdout: &mut io::Stdout, layout: &Layout) -> Result<()> {
        let mut rows = vec!["Fragments".to_string(), String::new()];
        if self.store.is_empty() {
            rows.push("No fragments collected.".into());
        } else {
            rows.extend(self.store.fragments().iter().map(|f| format!("· {f}")));
        }
        render_modal(stdout, layout, &rows)
    }

    fn render_ending(&self, stdout: &mut io::Stdout, layout: &Layout) -> Result<()> {
        let ending = self.playback.ending();
        let mut rows = vec![ending.message.clone(), String::new()];
        match &ending.next {
            Some(next) => rows.push(format!("[ {} ] → {next}", ending.action)),
            None => rows.push(format!("[ {} ]", ending.action)),
        }
        rows.push(String::new());
        rows.push(format!(
            "{} restart · {} quit",
            KeyBindings::primary(&self.config.key_bindings.restart),
            KeyBindings::primary(&self.config.key_bindings.quit),
        ));
        render_modal(stdout, layout, &rows)
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Print a hint like `"[Enter] next"`: the bracketed key bold, the rest dim.
fn print_hint(out: &mut impl Write, hint: &str) -> Result<()> {
    for segment in hint.split_inclusive(']') {
        let (label, key) = match segment.find('[') {
            Some(open) => segment.split_at(open),
            None => (segment, ""),
        };
        if !label.is_empty() {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(label),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
        if !key.is_empty() {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Bold),
                style::Print(key),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
    }
    Ok(())
}

fn draw_frame(out: &mut impl Write, x: u16, y: u16, w: u16, h: u16) -> Result<()> {
    if w < 2 || h < 2 {
        return Ok(());
    }
    let inner = "─".repeat(w as usize - 2);
    queue!(out, cursor::MoveTo(x, y), style::Print(format!("╭{inner}╮")))?;
    for row in 1..h - 1 {
        queue!(
            out,
            cursor::MoveTo(x, y + row),
            style::Print('│'),
            cursor::MoveTo(x + w - 1, y + row),
            style::Print('│'),
        )?;
    }
    queue!(out, cursor::MoveTo(x, y + h - 1), style::Print(format!("╰{inner}╯")))?;
    Ok(())
}

/// Centered box with one row per entry.
fn render_modal(out: &mut impl Write, layout: &Layout, rows: &[String]) -> Result<()> {
    let content_w = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u16;
    let w = (content_w + 6).min(layout.term_width);
    let h = (rows.len() as u16 + 2).min(layout.term_height);
    let x = (layout.term_width - w) / 2;
    let y = (layout.term_height - h) / 2;

    for row in 0..h {
        queue!(out, cursor::MoveTo(x, y + row), style::Print(" ".repeat(w as usize)))?;
    }
    draw_frame(out, x, y, w, h)?;
    for (i, row) in rows.iter().enumerate().take(h.saturating_sub(2) as usize) {
        let len = row.chars().count() as u16;
        let rx = x + w.saturating_sub(len) / 2;
        queue!(out, cursor::MoveTo(rx, y + 1 + i as u16), style::Print(row))?;
    }
    Ok(())
}
