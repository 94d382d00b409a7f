// Library surface for headless/integration tests and reuse.
// Terminal drawing and key bindings stay in the binary (main.rs).
pub mod activity;
pub mod app_dirs;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod picker;
pub mod runtime;

pub use error::{ActionError, ConfigError};
pub use game::Game;
