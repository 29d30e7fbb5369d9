//! Maze generation and live maze state for a turn-based terminal escape
//! game.

pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod movement;
pub mod paths;
pub mod scores;
pub mod session;
pub mod stats;
pub mod visibility;

pub use config::{Args, Difficulty, Settings, Skin};
pub use error::{Error, Result};
pub use generator::{GeneratorSettings, MazeGenerator};
pub use grid::{CellKind, Dir, Grid, Portals, Pos};
pub use movement::{attempt_move, MoveOutcome};
pub use session::{GameState, Hud, Session};
pub use visibility::{FogSettings, FogView};
