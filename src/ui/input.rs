//! Keyboard input: maps terminal key events to game actions and
//! keeps the pending guess being typed.
//!
//! Only Press/Repeat events count. Some terminals also report Release,
//! which would otherwise type every letter twice. Enter counts on Press
//! only; a held Enter would otherwise fire guess after guess.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

/// Longest guess the line editor accepts.
const MAX_GUESS_CHARS: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Type(char),
    Backspace,
    Submit,
    Pass,
    NewGame,
    Quit,
    /// Terminal resized; repaint.
    Redraw,
}

/// Map a single key event to an action, if it has one.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.kind == KeyEventKind::Repeat && key.code == KeyCode::Enter {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Tab => Some(Action::Pass),
        KeyCode::F(2) => Some(Action::NewGame),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !c.is_control() => Some(Action::Type(c)),
        _ => None,
    }
}

pub struct InputState {
    /// The guess being typed. Cleared on every submit.
    guess: String,
    pending: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            guess: String::with_capacity(MAX_GUESS_CHARS),
            pending: Vec::with_capacity(8),
        }
    }

    /// Block up to `timeout` for input, then drain everything available.
    pub fn wait_events(&mut self, timeout: Duration) -> io::Result<()> {
        if !poll(timeout)? {
            return Ok(());
        }
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = action_for(key) {
                        self.pending.push(action);
                    }
                }
                Event::Resize(..) => self.pending.push(Action::Redraw),
                _ => {}
            }
            if !poll(Duration::ZERO)? {
                return Ok(());
            }
        }
    }

    /// Take the actions collected since the last call.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending)
    }

    pub fn guess(&self) -> &str {
        &self.guess
    }

    /// Apply a line-editing action. Returns `true` if the guess changed.
    pub fn edit(&mut self, action: Action) -> bool {
        match action {
            Action::Type(c) if self.guess.chars().count() < MAX_GUESS_CHARS => {
                self.guess.push(c);
                true
            }
            Action::Backspace => self.guess.pop().is_some(),
            _ => false,
        }
    }

    /// Hand the guess over for submission, leaving the line empty.
    pub fn take_guess(&mut self) -> String {
        std::mem::take(&mut self.guess)
    }

    pub fn clear_guess(&mut self) {
        self.guess.clear();
    }
}
