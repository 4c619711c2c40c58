//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The play mode drives it one tick at a time and draws the frames it returns.

pub mod action;
pub mod bonus;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod frame;
pub mod glyph;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, TickInput};
pub use bonus::BonusTimer;
pub use config::{ConfigFile, GameConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use error::GameError;
pub use food::FoodSpawner;
pub use frame::{RenderFrame, SnakeCell};
pub use glyph::Glyph;
pub use grid::GridBounds;
pub use state::{GameState, Phase, Position, RoundEnd, Snake};
