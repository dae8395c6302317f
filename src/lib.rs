//! Bounded Conway's Game of Life engine.

pub mod config;
pub mod enc;
pub mod engine;
pub mod error;
pub mod pos;

pub use config::{Config, Pattern};
pub use enc::{PositionEncoder, RunLengthEncoded};
pub use engine::{Cell, GameOfLife, Grid};
pub use error::{Error, Result};
pub use pos::Pos2;
