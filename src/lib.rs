//! Term Snake - Snake on a wrap-around terminal grid
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - Key translation into per-tick input (input module)
//! - TUI rendering of the frames the core emits (render module)
//! - Session statistics (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
