pub mod border;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod line;
pub mod player;
pub mod renderer;
pub mod trail;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

pub use border::Border;
pub use config::GameConfig;
pub use entity::{Axis, Direction, Enemy, Position, Qix, Sparx};
pub use error::{ConfigError, SpliceError};
pub use game::{Cell, Game, GameState};
pub use line::Line;
pub use player::{Movement, Player};
pub use renderer::{Input, Renderer};
pub use trail::Trail;

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
