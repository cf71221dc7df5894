//! Presentation layer: draws a `SessionView` to the terminal.
//!
//! A frame is composed as a list of centered lines, then painted in
//! one batch of `queue!` commands flushed at the end. The frame is only
//! repainted when it differs from the previous one.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::sim::event::Feedback;
use crate::sim::session::{Phase, SessionView};

const TITLE: &str = "Scramble Game";
const PLAY_HELP: &str = "[Enter] guess   [Tab] pass   [F2] new game   [Esc] quit";
const OVER_HELP: &str = "[Enter] play again   [Esc] quit";

/// One row of the composed frame.
#[derive(Clone, PartialEq, Debug)]
pub struct Line {
    pub text: String,
    pub fg: Color,
    pub bold: bool,
}

impl Line {
    fn new(text: impl Into<String>, fg: Color) -> Self {
        Line { text: text.into(), fg, bold: false }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn blank() -> Self {
        Line::new("", Color::Reset)
    }
}

fn feedback_color(fb: Feedback) -> Color {
    match fb {
        Feedback::Correct | Feedback::Finished => Color::Green,
        Feedback::Incorrect | Feedback::GameOver => Color::Red,
        Feedback::Passed => Color::Yellow,
    }
}

/// Spread letters out so a short word reads as a puzzle.
fn spaced(word: &str) -> String {
    let letters: Vec<String> = word.chars().map(|c| c.to_uppercase().to_string()).collect();
    letters.join(" ")
}

/// Build the frame for `view` with `guess` as the pending input line.
pub fn compose(view: &SessionView, guess: &str) -> Vec<Line> {
    let mut lines = vec![Line::new(TITLE, Color::Cyan).bold(), Line::blank()];

    if view.game_over {
        let (msg, color) = match view.feedback {
            Some(fb) => (fb.message(), feedback_color(fb)),
            None if view.phase == Phase::GameOverLost => (Feedback::GameOver.message(), Color::Red),
            None => (Feedback::Finished.message(), Color::Green),
        };
        lines.push(Line::new(msg, color).bold());
        lines.push(Line::blank());
        lines.push(Line::new(format!("Final Score: {}", view.points), Color::White));
        lines.push(Line::blank());
        lines.push(Line::new(OVER_HELP, Color::DarkGrey));
        return lines;
    }

    lines.push(Line::new(spaced(&view.scrambled), Color::White).bold());
    lines.push(Line::blank());
    lines.push(Line::new(format!("> {guess}_"), Color::White));
    lines.push(Line::blank());
    match view.feedback {
        Some(fb) => lines.push(Line::new(fb.message(), feedback_color(fb))),
        None => lines.push(Line::blank()),
    }
    lines.push(Line::blank());

    let pass_color = if view.passes_remaining == 0 { Color::DarkGrey } else { Color::White };
    lines.push(Line::new(format!("Pass ({}/{} left)", view.passes_remaining, view.max_passes), pass_color));
    lines.push(Line::new(
        format!("Points: {}  |  Strikes: {}/{}", view.points, view.strikes, view.max_strikes),
        Color::White,
    ));
    lines.push(Line::blank());
    lines.push(Line::new(PLAY_HELP, Color::DarkGrey));
    lines
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    last_frame: Vec<Line>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(4096, io::stdout()),
            last_frame: vec![],
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Forget the previous frame so the next render repaints everything.
    pub fn invalidate(&mut self) {
        self.last_frame.clear();
    }

    pub fn render(&mut self, view: &SessionView, guess: &str) -> io::Result<()> {
        let frame = compose(view, guess);
        if frame == self.last_frame {
            return Ok(());
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let top = (th as usize).saturating_sub(frame.len()) / 2;

        queue!(self.writer, ResetColor, Clear(ClearType::All))?;
        for (i, line) in frame.iter().enumerate() {
            let width = line.text.chars().count();
            let left = (tw as usize).saturating_sub(width) / 2;
            queue!(self.writer, MoveTo(left as u16, (top + i) as u16))?;
            if line.bold {
                queue!(self.writer, SetAttribute(Attribute::Bold))?;
            }
            queue!(
                self.writer,
                SetForegroundColor(line.fg),
                Print(&line.text),
                SetAttribute(Attribute::Reset)
            )?;
        }
        self.writer.flush()?;

        self.last_frame = frame;
        Ok(())
    }
}
