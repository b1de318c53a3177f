//! Presentation of the engine state.

use crate::command::Command;
use life_core::{ConsoleConfig, Result};
use life_engine::GameOfLife;
use std::io::Write;
use tokio::sync::mpsc;

/// A presentation target driven once per frame.
///
/// Renderers only read the engine; edits go back through [`Command`]s.
pub trait Renderer {
    fn render(&mut self, game: &GameOfLife, paused: bool) -> Result<()>;

    /// Commands received since the previous call
    fn handle_input(&mut self) -> Vec<Command>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub alive: char,
    pub dead: char,
    pub border: bool,
}

impl From<&ConsoleConfig> for TextStyle {
    fn from(config: &ConsoleConfig) -> Self {
        Self {
            alive: config.alive_char,
            dead: config.dead_char,
            border: config.border,
        }
    }
}

/// Draws frames as plain text to any writer
pub struct TextRenderer<W: Write> {
    out: W,
    style: TextStyle,
    input: mpsc::UnboundedReceiver<Command>,
    clear_screen: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, style: TextStyle, input: mpsc::UnboundedReceiver<Command>) -> Self {
        Self {
            out,
            style,
            input,
            clear_screen: false,
        }
    }

    /// Emit an ANSI clear before every frame
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn border_line(&self, cols: usize) -> String {
        format!("+{}+", "-".repeat(cols))
    }

    fn status_line(game: &GameOfLife, paused: bool) -> String {
        let mut status = format!(
            "generation {} | population {}",
            game.generations(),
            game.current().population()
        );
        if let Some(max) = game.max_generations() {
            status.push_str(&format!(" / max {}", max));
        }
        if paused {
            status.push_str(" | paused");
        } else if game.is_max_generations_exceeded() {
            status.push_str(" | limit reached");
        } else if !game.is_changing() {
            status.push_str(" | settled");
        }
        status
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, game: &GameOfLife, paused: bool) -> Result<()> {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str("\x1b[2J\x1b[H");
        }
        if self.style.border {
            frame.push_str(&self.border_line(game.cols()));
            frame.push('\n');
        }
        for row in game.current().rows() {
            if self.style.border {
                frame.push('|');
            }
            frame.extend(row.iter().map(|cell| {
                if cell.is_alive() {
                    self.style.alive
                } else {
                    self.style.dead
                }
            }));
            if self.style.border {
                frame.push('|');
            }
            frame.push('\n');
        }
        if self.style.border {
            frame.push_str(&self.border_line(game.cols()));
            frame.push('\n');
        }
        frame.push_str(&Self::status_line(game, paused));
        frame.push('\n');

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn handle_input(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Ok(command) = self.input.try_recv() {
            commands.push(command);
        }
        commands
    }
}
