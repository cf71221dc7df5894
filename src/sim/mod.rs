pub mod event;
pub mod game;
pub mod save;
pub mod session;
