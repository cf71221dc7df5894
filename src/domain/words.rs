//! Word list and session limits.

/// Candidate words. Shuffled before every new game, so order is irrelevant.
pub const WORDS: &[&str] = &[
    "mockup", "layout", "design", "canvas", "pixels",
    "border", "circle", "shadow", "button", "vector",
];

/// Wrong guesses allowed before the session is lost.
pub const MAX_STRIKES: u32 = 3;

/// Words the player may skip per session.
pub const MAX_PASSES: u32 = 3;
