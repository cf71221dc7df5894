//! GameSession: the word queue, the current puzzle and the counters.
//!
//! ## State machine
//!
//!   Playing ──(queue exhausted)──▶ GameOverWon
//!      │
//!      └────(strikes == MAX)────▶ GameOverLost
//!
//! Both game-over phases are terminal: guesses and passes are no-ops
//! until `start_new_game` replaces the session.
//!
//! Commands take the RNG explicitly and return the events they produced.
//! The observable state is read through [`GameSession::view`].

use std::collections::VecDeque;

use crate::domain::rng::GameRng;
use crate::domain::scramble::scramble;
use crate::domain::words::{MAX_PASSES, MAX_STRIKES, WORDS};
use crate::sim::event::{Feedback, GameEvent};
use crate::sim::save::Snapshot;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOverWon,
    GameOverLost,
}

/// Read-only copy of everything the UI shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    pub scrambled: String,
    pub points: u32,
    pub strikes: u32,
    pub max_strikes: u32,
    pub passes_remaining: u32,
    pub max_passes: u32,
    pub phase: Phase,
    pub game_over: bool,
    pub feedback: Option<Feedback>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    remaining_words: VecDeque<String>,
    current_word: Option<String>,
    /// Permutation of `current_word`; empty when there is none.
    scrambled: String,
    points: u32,
    strikes: u32,
    passes_remaining: u32,
    phase: Phase,
    feedback: Option<Feedback>,
}

// ── Construction ──

impl GameSession {
    /// Fresh session over the built-in word list.
    pub fn start_new_game(rng: &mut GameRng) -> Self {
        Self::with_words(WORDS, rng)
    }

    /// Fresh session over `words`: shuffled, first word current, rest queued.
    pub fn with_words(words: &[&str], rng: &mut GameRng) -> Self {
        let mut queue: VecDeque<String> = scramble(words, rng)
            .into_iter()
            .map(str::to_string)
            .collect();
        let current_word = queue.pop_front();
        let scrambled = current_word
            .as_deref()
            .map(|w| scramble(w, rng))
            .unwrap_or_default();
        let phase = if current_word.is_some() {
            Phase::Playing
        } else {
            Phase::GameOverWon
        };

        GameSession {
            remaining_words: queue,
            current_word,
            scrambled,
            points: 0,
            strikes: 0,
            passes_remaining: MAX_PASSES,
            phase,
            feedback: None,
        }
    }

    /// Resume verbatim from a snapshot. No re-scrambling.
    pub fn from_snapshot(snap: Snapshot) -> Self {
        let phase = if !snap.game_over {
            Phase::Playing
        } else if snap.strikes >= MAX_STRIKES {
            Phase::GameOverLost
        } else {
            Phase::GameOverWon
        };
        let current_word = if snap.current_word.is_empty() {
            None
        } else {
            Some(snap.current_word)
        };

        GameSession {
            remaining_words: snap.words.into(),
            current_word,
            scrambled: snap.scrambled_word,
            points: snap.points,
            strikes: snap.strikes.min(MAX_STRIKES),
            passes_remaining: snap.passes.min(MAX_PASSES),
            phase,
            feedback: snap.feedback,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            words: self.remaining_words.iter().cloned().collect(),
            current_word: self.current_word.clone().unwrap_or_default(),
            scrambled_word: self.scrambled.clone(),
            points: self.points,
            strikes: self.strikes,
            passes: self.passes_remaining,
            game_over: self.is_over(),
            feedback: self.feedback,
        }
    }
}

// ── Queries ──

impl GameSession {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase != Phase::Playing
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    pub fn remaining_words(&self) -> impl Iterator<Item = &str> {
        self.remaining_words.iter().map(String::as_str)
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn passes_remaining(&self) -> u32 {
        self.passes_remaining
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            scrambled: self.scrambled.clone(),
            points: self.points,
            strikes: self.strikes,
            max_strikes: MAX_STRIKES,
            passes_remaining: self.passes_remaining,
            max_passes: MAX_PASSES,
            phase: self.phase,
            game_over: self.is_over(),
            feedback: self.feedback,
        }
    }
}

// ── Commands ──

impl GameSession {
    /// Check `text` against the current word, ignoring case and surrounding whitespace.
    pub fn submit_guess(&mut self, text: &str, rng: &mut GameRng) -> Vec<GameEvent> {
        if self.is_over() {
            return vec![];
        }

        let target = self.current_word.as_deref().unwrap_or("");
        if normalize(text) == normalize(target) {
            let word = target.to_string();
            self.points = self.points.saturating_add(1);
            self.feedback = Some(Feedback::Correct);
            let mut events = vec![GameEvent::Solved { word, points: self.points }];
            events.push(self.advance(rng));
            events
        } else {
            self.strikes = (self.strikes + 1).min(MAX_STRIKES);
            self.feedback = Some(Feedback::Incorrect);
            let mut events = vec![GameEvent::Missed { strikes: self.strikes }];
            if self.strikes >= MAX_STRIKES {
                self.phase = Phase::GameOverLost;
                self.feedback = Some(Feedback::GameOver);
                events.push(GameEvent::Lost { points: self.points });
            }
            events
        }
    }

    /// Skip the current word without scoring. No-op when no passes are left.
    pub fn pass(&mut self, rng: &mut GameRng) -> Vec<GameEvent> {
        if self.is_over() || self.passes_remaining == 0 {
            return vec![];
        }

        self.passes_remaining -= 1;
        let word = self.current_word.clone().unwrap_or_default();
        self.feedback = Some(Feedback::Passed);
        let mut events = vec![GameEvent::Skipped {
            word,
            passes_remaining: self.passes_remaining,
        }];
        events.push(self.advance(rng));
        events
    }

    /// Pop the next word, or finish the session if the queue is empty.
    fn advance(&mut self, rng: &mut GameRng) -> GameEvent {
        match self.remaining_words.pop_front() {
            Some(next) => {
                self.scrambled = scramble(next.as_str(), rng);
                self.current_word = Some(next);
                GameEvent::NextWord
            }
            None => {
                self.current_word = None;
                self.scrambled.clear();
                self.phase = Phase::GameOverWon;
                self.feedback = Some(Feedback::Finished);
                GameEvent::Won { points: self.points }
            }
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted_chars(s: &str) -> Vec<char> {
        let mut v: Vec<char> = s.chars().collect();
        v.sort_unstable();
        v
    }

    /// Helper: a playing session with a known word order.
    fn session(current: &str, queue: &[&str]) -> GameSession {
        GameSession::from_snapshot(Snapshot {
            words: queue.iter().map(|w| w.to_string()).collect(),
            current_word: current.to_string(),
            scrambled_word: current.chars().rev().collect(),
            points: 0,
            strikes: 0,
            passes: MAX_PASSES,
            game_over: false,
            feedback: None,
        })
    }

    // ── New game ──

    #[test]
    fn new_game_starts_clean() {
        let mut rng = GameRng::new(11);
        let s = GameSession::start_new_game(&mut rng);
        assert_eq!(s.phase(), Phase::Playing);
        assert!(!s.is_over());
        assert_eq!(s.points(), 0);
        assert_eq!(s.strikes(), 0);
        assert_eq!(s.passes_remaining(), MAX_PASSES);
        assert!(s.view().feedback.is_none());

        let current = s.current_word().unwrap();
        assert!(WORDS.contains(&current));
        assert_eq!(sorted_chars(&s.view().scrambled), sorted_chars(current));
    }

    #[test]
    fn new_game_uses_every_word_once() {
        let mut rng = GameRng::new(12);
        let s = GameSession::start_new_game(&mut rng);
        let mut all: Vec<&str> = s.current_word().into_iter().chain(s.remaining_words()).collect();
        all.sort();
        let mut expected = WORDS.to_vec();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn empty_word_list_is_already_won() {
        let mut rng = GameRng::new(0);
        let s = GameSession::with_words(&[], &mut rng);
        assert_eq!(s.phase(), Phase::GameOverWon);
        assert!(s.current_word().is_none());
    }

    // ── Guessing ──

    #[test]
    fn correct_guess_ignores_case_and_whitespace() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &["layout"]);
        let events = s.submit_guess("  MOCKUP \n", &mut rng);

        assert_eq!(s.points(), 1);
        assert_eq!(s.current_word(), Some("layout"));
        assert_eq!(sorted_chars(&s.view().scrambled), sorted_chars("layout"));
        assert_eq!(s.view().feedback, Some(Feedback::Correct));
        assert_eq!(events, vec![
            GameEvent::Solved { word: "mockup".into(), points: 1 },
            GameEvent::NextWord,
        ]);
    }

    #[test]
    fn target_case_is_normalized_too() {
        let mut rng = GameRng::new(1);
        let mut s = session("Canvas", &["layout"]);
        s.submit_guess("canvas", &mut rng);
        assert_eq!(s.points(), 1);
    }

    #[test]
    fn wrong_guess_costs_a_strike() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &["layout"]);
        let events = s.submit_guess("mock", &mut rng);

        assert_eq!(s.strikes(), 1);
        assert_eq!(s.points(), 0);
        assert_eq!(s.current_word(), Some("mockup"));
        assert_eq!(s.view().feedback, Some(Feedback::Incorrect));
        assert_eq!(events, vec![GameEvent::Missed { strikes: 1 }]);
    }

    #[test]
    fn empty_guess_is_an_ordinary_miss() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &[]);
        s.submit_guess("", &mut rng);
        s.submit_guess("   ", &mut rng);
        assert_eq!(s.strikes(), 2);
    }

    #[test]
    fn three_misses_lose_the_game() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &["layout"]);
        s.submit_guess("a", &mut rng);
        s.submit_guess("b", &mut rng);
        let events = s.submit_guess("c", &mut rng);

        assert_eq!(s.strikes(), MAX_STRIKES);
        assert!(s.is_over());
        assert_eq!(s.phase(), Phase::GameOverLost);
        assert_eq!(s.view().feedback, Some(Feedback::GameOver));
        assert_eq!(events.last(), Some(&GameEvent::Lost { points: 0 }));
    }

    #[test]
    fn last_word_solved_wins() {
        let mut rng = GameRng::new(1);
        let mut s = session("vector", &[]);
        let events = s.submit_guess("vector", &mut rng);

        assert_eq!(s.remaining_words().count(), 0);
        assert_eq!(s.phase(), Phase::GameOverWon);
        assert!(s.current_word().is_none());
        assert!(s.view().scrambled.is_empty());
        assert_eq!(s.view().feedback, Some(Feedback::Finished));
        assert_eq!(events.last(), Some(&GameEvent::Won { points: 1 }));
    }

    // ── Passing ──

    #[test]
    fn pass_advances_without_scoring() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &["layout", "design"]);
        let events = s.pass(&mut rng);

        assert_eq!(s.passes_remaining(), MAX_PASSES - 1);
        assert_eq!(s.points(), 0);
        assert_eq!(s.current_word(), Some("layout"));
        assert_eq!(s.view().feedback, Some(Feedback::Passed));
        assert_eq!(events[0], GameEvent::Skipped {
            word: "mockup".into(),
            passes_remaining: MAX_PASSES - 1,
        });
    }

    #[test]
    fn pass_on_last_word_wins() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &[]);
        s.pass(&mut rng);
        assert_eq!(s.phase(), Phase::GameOverWon);
        assert_eq!(s.view().feedback, Some(Feedback::Finished));
    }

    #[test]
    fn pass_with_none_left_is_noop() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &["layout", "design", "canvas", "pixels"]);
        for _ in 0..MAX_PASSES {
            s.pass(&mut rng);
        }
        assert_eq!(s.passes_remaining(), 0);

        let before = s.clone();
        assert!(s.pass(&mut rng).is_empty());
        assert_eq!(s, before);
    }

    // ── Terminal states ──

    #[test]
    fn commands_after_game_over_change_nothing() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &["layout"]);
        for _ in 0..MAX_STRIKES {
            s.submit_guess("nope", &mut rng);
        }
        let before = s.clone();

        assert!(s.submit_guess("mockup", &mut rng).is_empty());
        assert!(s.submit_guess("nope", &mut rng).is_empty());
        assert!(s.pass(&mut rng).is_empty());
        assert_eq!(s, before);
    }

    // ── Snapshots ──

    #[test]
    fn snapshot_round_trip_is_verbatim() {
        let mut rng = GameRng::new(21);
        let mut s = GameSession::start_new_game(&mut rng);
        s.submit_guess("wrong", &mut rng);
        s.pass(&mut rng);

        let restored = GameSession::from_snapshot(s.snapshot());
        assert_eq!(restored, s);
    }

    #[test]
    fn snapshot_of_won_game_has_empty_current_word() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &[]);
        s.submit_guess("mockup", &mut rng);
        let snap = s.snapshot();
        assert!(snap.game_over);
        assert_eq!(snap.current_word, "");
        assert_eq!(GameSession::from_snapshot(snap).phase(), Phase::GameOverWon);
    }

    #[test]
    fn lost_phase_is_recovered_from_strikes() {
        let mut rng = GameRng::new(1);
        let mut s = session("mockup", &["layout"]);
        for _ in 0..MAX_STRIKES {
            s.submit_guess("x", &mut rng);
        }
        assert_eq!(GameSession::from_snapshot(s.snapshot()).phase(), Phase::GameOverLost);
    }

    // ── Invariants under arbitrary play ──

    #[derive(Clone, Debug)]
    enum Cmd {
        Guess(String),
        Correct,
        Pass,
    }

    fn cmd() -> impl Strategy<Value = Cmd> {
        prop_oneof![
            "[a-z ]{0,8}".prop_map(Cmd::Guess),
            Just(Cmd::Correct),
            Just(Cmd::Pass),
        ]
    }

    proptest! {
        #[test]
        fn counters_stay_in_range(seed in any::<u64>(), cmds in prop::collection::vec(cmd(), 0..40)) {
            let mut rng = GameRng::new(seed);
            let mut s = GameSession::start_new_game(&mut rng);
            let mut correct = 0;

            for c in cmds {
                let was_over = s.is_over();
                let before = s.clone();
                let events = match c {
                    Cmd::Guess(text) => s.submit_guess(&text, &mut rng),
                    Cmd::Correct => {
                        let word = s.current_word().unwrap_or("").to_uppercase();
                        s.submit_guess(&word, &mut rng)
                    }
                    Cmd::Pass => s.pass(&mut rng),
                };
                if events.iter().any(|e| matches!(e, GameEvent::Solved { .. })) {
                    correct += 1;
                }

                prop_assert!(s.strikes() <= MAX_STRIKES);
                prop_assert!(s.passes_remaining() <= MAX_PASSES);
                prop_assert_eq!(s.points(), correct);
                if was_over {
                    prop_assert_eq!(&s, &before);
                }
                if let Some(word) = s.current_word() {
                    prop_assert_eq!(sorted_chars(&s.view().scrambled), sorted_chars(word));
                }
                prop_assert_eq!(s.view().game_over, s.phase() != Phase::Playing);
            }
        }
    }
}
