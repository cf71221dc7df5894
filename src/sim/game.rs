//! Game: one session plus its store and random source.
//!
//! Every command that changes the session writes the full snapshot.
//! A new game clears the stored record instead, so an abandoned session
//! is never resurrected. Write failures are logged and play continues.

use tracing::{debug, info, warn};

use crate::domain::rng::GameRng;
use crate::sim::event::GameEvent;
use crate::sim::save::SessionStore;
use crate::sim::session::{GameSession, SessionView};

pub struct Game<S: SessionStore> {
    session: GameSession,
    store: S,
    rng: GameRng,
    resumed: bool,
}

impl<S: SessionStore> Game<S> {
    /// Resume the stored session, or start a new one if there is none.
    pub fn launch(store: S, rng: GameRng) -> Self {
        match store.load() {
            Some(snap) => {
                let session = GameSession::from_snapshot(snap);
                info!(
                    points = session.points(),
                    strikes = session.strikes(),
                    words_left = session.remaining_words().count(),
                    passes = session.passes_remaining(),
                    over = session.is_over(),
                    "resumed saved session"
                );
                Game { session, store, rng, resumed: true }
            }
            None => {
                let mut rng = rng;
                let session = GameSession::start_new_game(&mut rng);
                let mut game = Game { session, store, rng, resumed: false };
                game.forget();
                info!(seed = game.rng.seed(), "started new session");
                game
            }
        }
    }

    /// Was this game restored from a saved session?
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    #[cfg(test)]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Commands ──

    /// Discard the current session (finished or not) and deal a fresh one.
    pub fn new_game(&mut self) -> SessionView {
        self.session = GameSession::start_new_game(&mut self.rng);
        self.resumed = false;
        self.forget();
        info!("started new session");
        debug!(word = self.session.current_word(), "first word");
        self.view()
    }

    pub fn submit_guess(&mut self, text: &str) -> (Vec<GameEvent>, SessionView) {
        let events = self.session.submit_guess(text, &mut self.rng);
        self.after(&events);
        (events, self.view())
    }

    pub fn pass(&mut self) -> (Vec<GameEvent>, SessionView) {
        let events = self.session.pass(&mut self.rng);
        self.after(&events);
        (events, self.view())
    }

    // ── Internal ──

    fn after(&mut self, events: &[GameEvent]) {
        if events.is_empty() {
            debug!("command ignored");
            return;
        }
        for event in events {
            log_event(event);
        }
        if events.iter().any(GameEvent::ends_game) {
            info!(
                phase = ?self.session.phase(),
                points = self.session.points(),
                strikes = self.session.strikes(),
                "session over"
            );
        }
        self.persist();
    }

    fn persist(&mut self) {
        let snap = self.session.snapshot();
        if let Err(e) = self.store.save(&snap) {
            warn!(error = %e, "could not save session");
        }
    }

    fn forget(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not clear saved session");
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Solved { word, points } => debug!(%word, points, "solved"),
        GameEvent::Missed { strikes } => debug!(strikes, "missed"),
        GameEvent::Skipped { word, passes_remaining } => debug!(%word, passes_remaining, "skipped"),
        GameEvent::NextWord => debug!("next word"),
        GameEvent::Won { points } => debug!(points, "finished all words"),
        GameEvent::Lost { points } => debug!(points, "out of strikes"),
    }
}
