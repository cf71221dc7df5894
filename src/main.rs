//! Entry point and event loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::Duration;

use tracing::{info, warn};

use config::GameConfig;
use domain::rng::GameRng;
use error::AppError;
use sim::game::Game;
use sim::save::{FileStore, MemoryStore, SessionStore};
use sim::session::SessionView;
use ui::input::{Action, InputState};
use ui::renderer::Renderer;

/// Upper bound on how long the loop waits for a key before repainting.
const INPUT_WAIT: Duration = Duration::from_millis(250);

fn main() {
    let mut config = GameConfig::load();
    config.apply_args(std::env::args().skip(1));

    match logging::init(&config.log) {
        Ok(_) => {}
        Err(e) => eprintln!("Warning: {e}; logging disabled"),
    }
    for w in &config.warnings {
        warn!("{w}");
    }

    let store: Box<dyn SessionStore> = if config.no_save {
        Box::new(MemoryStore::new())
    } else {
        let store = FileStore::in_dir(config.save_dir.as_deref(), &config.save_file);
        info!(path = %store.path().display(), "session file");
        Box::new(store)
    };
    let rng = match config.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };

    let mut game = Game::launch(store, rng);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = event_loop(&mut game, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "game loop aborted");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Scramble!");
    println!("Final Score: {}", game.view().points);
}

fn event_loop<S: SessionStore>(game: &mut Game<S>, renderer: &mut Renderer) -> Result<(), AppError> {
    let mut input = InputState::new();
    let mut view = game.view();
    if game.resumed() {
        info!("continuing previous session");
    }

    loop {
        renderer.render(&view, input.guess())?;
        // actions in this batch may only restart an end screen the player has seen
        let end_screen_up = view.game_over;
        input.wait_events(INPUT_WAIT)?;

        for action in input.take_actions() {
            match action {
                Action::Quit => return Ok(()),
                Action::Redraw => renderer.invalidate(),
                _ => {
                    let shown = end_screen_up && view.game_over;
                    if let Some(next) = apply_action(game, &mut input, &view, shown, action) {
                        view = next;
                    }
                }
            }
        }
    }
}

/// Apply one game action. Returns the new view when the session changed.
///
/// `end_screen_up` is true only while the painted frame is the end screen.
/// Enter plays again from there; F2 plays again at any time.
fn apply_action<S: SessionStore>(
    game: &mut Game<S>,
    input: &mut InputState,
    view: &SessionView,
    end_screen_up: bool,
    action: Action,
) -> Option<SessionView> {
    match action {
        Action::NewGame => {
            input.clear_guess();
            Some(game.new_game())
        }
        Action::Submit if view.game_over => {
            if !end_screen_up {
                return None;
            }
            input.clear_guess();
            Some(game.new_game())
        }
        Action::Submit => {
            // blank line is not sent
            if input.guess().is_empty() {
                return None;
            }
            let guess = input.take_guess();
            Some(game.submit_guess(&guess).1)
        }
        Action::Pass => Some(game.pass().1),
        Action::Type(_) | Action::Backspace => {
            if !view.game_over {
                input.edit(action);
            }
            None
        }
        Action::Quit | Action::Redraw => None,
    }
}
