use std::io::{Write, stdout};
use std::panic;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use rand::Rng;

use crate::game::GameState;
use crate::TermInt;

const SNAKE_CHAR: char = '◆';
const FOOD_CHAR: char = '★';
const START_SCREEN_WIDTH: usize = 40;

/// Keeps the terminal in raw mode on the alternate screen for as long as it
/// lives. Dropping it puts things back. A panic restores the terminal before
/// its message is printed, so the message stays readable.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn enable() -> crossterm::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = RawModeGuard { active: true };
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;

        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = leave_screen(&mut stdout());
            let _ = terminal::disable_raw_mode();
            default_hook(info);
        }));

        Ok(guard)
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        leave_screen(&mut stdout())?;
        terminal::disable_raw_mode()
    }
}

fn leave_screen<W: Write>(out: &mut W) -> crossterm::Result<()> {
    execute!(out, cursor::Show, LeaveAlternateScreen)
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Draws everything the player sees. Raw mode does not translate newlines, so
/// every line is placed with an explicit cursor move.
pub struct TermManager<W: Write> {
    out: W,
    message_row: TermInt,
}

impl<W: Write> TermManager<W> {
    pub fn new(out: W) -> Self {
        TermManager { out, message_row: 0 }
    }

    pub fn show_start_screen(&mut self, high_score: u32) -> crossterm::Result<()> {
        let inner = START_SCREEN_WIDTH - 2;
        let border = "─".repeat(inner);
        let title = "SNAKE CLI";
        let left = (inner - title.len()) / 2;

        let mut lines = vec![
            format!("┌{}┐", border),
            format!("│{}{}{}│", " ".repeat(left), title, " ".repeat(inner - left - title.len())),
            format!("│{}│", " ".repeat(inner)),
        ];

        let body = [
            "Instructions:".to_string(),
            "- Use arrow keys or WASD to move".to_string(),
            "- P to pause/resume".to_string(),
            "- F to restart, Q to quit".to_string(),
            String::new(),
            format!("High Score: {}", high_score),
            String::new(),
            "Press any key to start".to_string(),
        ];
        for line in body.iter() {
            lines.push(format!("│ {:<width$} │", line, width = inner - 2));
        }
        lines.push(format!("└{}┘", border));

        self.show_screen(&lines)
    }

    pub fn show_menu(&mut self, title: &str, options: &[&str], high_score: Option<u32>) -> crossterm::Result<()> {
        let mut lines = vec![];
        if let Some(score) = high_score {
            lines.push("Welcome to Snake CLI!".to_string());
            lines.push(format!("Current High Score: {}", score));
        }
        lines.push(title.to_string());
        lines.extend(options.iter().map(|o| o.to_string()));
        lines.push("Enter choice (1-3): ".to_string());

        self.show_screen(&lines)
    }

    /// Board, footer, and nothing below them.
    pub fn draw_frame<R: Rng>(&mut self, state: &GameState<R>, high_score: u32) -> crossterm::Result<()> {
        let (width, height) = state.size();
        let border = "─".repeat(width as usize);

        queue!(self.out, terminal::Clear(ClearType::All))?;
        self.print_line(0, &format!("┌{}┐", border))?;

        for y in 0..height {
            queue!(self.out, cursor::MoveTo(0, y + 1), style::Print('│'))?;
            for x in 0..width {
                let pos = (x, y);
                if state.snake().contains(&pos) {
                    self.print_colored(SNAKE_CHAR, Color::Green)?;
                } else if state.food().contains(&pos) {
                    self.print_colored(FOOD_CHAR, Color::Red)?;
                } else {
                    queue!(self.out, style::Print(' '))?;
                }
            }
            queue!(self.out, style::Print('│'))?;
        }

        self.print_line(height + 1, &format!("└{}┘", border))?;
        self.print_line(height + 2, &format!(
            "Difficulty: {} | Score: {} | High Score: {}",
            state.difficulty(), state.score(), high_score
        ))?;
        self.message_row = height + 3;

        self.flush()
    }

    /// Replaces whatever is under the footer with `lines`, in yellow.
    pub fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
        let row = self.message_row;
        queue!(
            self.out,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::FromCursorDown),
            style::SetForegroundColor(Color::Yellow)
        )?;
        for (i, line) in lines.iter().enumerate() {
            self.print_line(row + i as TermInt, line)?;
        }
        queue!(self.out, style::ResetColor)?;

        self.flush()
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.out.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_screen(&mut self, lines: &[String]) -> crossterm::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;
        for (i, line) in lines.iter().enumerate() {
            self.print_line(i as TermInt, line)?;
        }
        self.message_row = lines.len() as TermInt;

        self.flush()
    }

    fn print_line(&mut self, row: TermInt, line: &str) -> crossterm::Result<()> {
        queue!(self.out, cursor::MoveTo(0, row), style::Print(line))
    }

    fn print_colored(&mut self, ch: char, color: Color) -> crossterm::Result<()> {
        queue!(self.out, style::SetForegroundColor(color), style::Print(ch), style::ResetColor)
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    #[cfg(test)]
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }
}
