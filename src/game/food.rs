//! Picking free cells for food

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use super::grid::GridBounds;
use super::state::Position;

/// Blind draws tried before falling back to scanning the free cells
pub const MAX_RANDOM_ATTEMPTS: usize = 64;

/// Places food on cells nothing else is using.
///
/// Draws uniformly over the whole grid first, which is cheap while the board
/// is mostly empty. After [`MAX_RANDOM_ATTEMPTS`] misses it samples directly
/// from the free cells, so a crowded board costs one scan instead of an
/// unbounded loop, and a full board yields `None`.
#[derive(Debug, Clone)]
pub struct FoodSpawner<R> {
    rng: R,
    max_attempts: usize,
}

impl<R: Rng> FoodSpawner<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: MAX_RANDOM_ATTEMPTS,
        }
    }

    /// Override the number of blind draws (zero skips straight to the scan)
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// A random free cell, or `None` when every cell is occupied
    pub fn spawn(&mut self, occupied: &HashSet<Position>, bounds: GridBounds) -> Option<Position> {
        if occupied.len() >= bounds.area()
            && bounds.positions().all(|pos| occupied.contains(&pos))
        {
            return None;
        }

        for _ in 0..self.max_attempts {
            let pos = Position::new(
                self.rng.gen_range(0..i32::from(bounds.height())),
                self.rng.gen_range(0..i32::from(bounds.width())),
            );
            if !occupied.contains(&pos) {
                return Some(pos);
            }
        }

        bounds
            .positions()
            .filter(|pos| !occupied.contains(pos))
            .choose(&mut self.rng)
    }
}
