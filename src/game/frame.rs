use std::time::Instant;

use super::glyph::{Glyph, body_glyphs};
use super::grid::GridBounds;
use super::state::{GameState, Phase, Position};

/// One occupied snake cell and how to draw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnakeCell {
    pub position: Position,
    pub glyph: Glyph,
}

/// Everything a renderer needs to draw one tick; no terminal types involved
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Snake cells, head first
    pub snake: Vec<SnakeCell>,
    pub food: Position,
    pub bonus_food: Option<Position>,
    /// Remaining share of the bonus window, 0.0..=1.0, while one is open
    pub bonus_remaining: Option<f64>,
    pub score: u32,
    pub level: u32,
    pub phase: Phase,
    pub bounds: GridBounds,
}

impl RenderFrame {
    pub fn capture(state: &GameState, now: Instant) -> Self {
        let segments = state.snake.segments();
        let glyphs = body_glyphs(segments, state.direction, state.bounds);

        // A paused clock is read at the moment the pause began
        let clock = state.paused_at.unwrap_or(now);

        Self {
            snake: segments
                .iter()
                .zip(glyphs)
                .map(|(&position, glyph)| SnakeCell { position, glyph })
                .collect(),
            food: state.food,
            bonus_food: state.bonus.food(),
            bonus_remaining: state.bonus.remaining_fraction(clock),
            score: state.score,
            level: state.level,
            phase: state.phase,
            bounds: state.bounds,
        }
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }
}
