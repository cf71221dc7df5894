//! Outcomes of session commands.
//! The presentation layer consumes these for feedback and logging.

use serde::{Deserialize, Serialize};

/// Last user-facing outcome, kept on the session and in snapshots.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    Incorrect,
    Passed,
    Finished, // queue exhausted
    GameOver, // strikes exhausted
}

impl Feedback {
    pub fn message(self) -> &'static str {
        match self {
            Feedback::Correct => "Correct!",
            Feedback::Incorrect => "Incorrect.",
            Feedback::Passed => "Passed.",
            Feedback::Finished => "You finished all the words!",
            Feedback::GameOver => "Game Over!",
        }
    }
}

/// Emitted by a command. An empty event list means the command was a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Solved { word: String, points: u32 },
    Missed { strikes: u32 },
    Skipped { word: String, passes_remaining: u32 },
    NextWord,
    Won { points: u32 },
    Lost { points: u32 },
}

impl GameEvent {
    pub fn ends_game(&self) -> bool {
        matches!(self, GameEvent::Won { .. } | GameEvent::Lost { .. })
    }
}
