use thiserror::Error;

/// Configuration problems that stop a round from starting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("grid dimensions must be positive, got {height}x{width}")]
    InvalidBounds { height: u16, width: u16 },

    #[error("grid {height}x{width} cannot hold the starting snake and a food")]
    GridTooSmall { height: u16, width: u16 },
}
