use std::collections::HashSet;
use std::time::Instant;

use super::action::Direction;
use super::bonus::BonusTimer;
use super::grid::GridBounds;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move position by delta
    pub fn moved_by(&self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Move position one step in a direction, without wrapping
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (drow, dcol) = direction.delta();
        self.moved_by(drow, dcol)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
}

impl Snake {
    /// Create a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>) -> Self {
        Self { body }
    }

    /// The two-cell snake a round starts with: a head and one segment behind it
    pub fn starting(head: Position, tail: Position) -> Self {
        Self {
            body: vec![head, tail],
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    /// Where the head would go next, before wrapping
    pub fn advance(&self, direction: Direction) -> Position {
        self.head().moved_in_direction(direction)
    }

    /// True if the (already wrapped) candidate head lands on any segment.
    ///
    /// The tail counts too, even though it would move away on a plain move.
    pub fn will_collide(&self, candidate: Position) -> bool {
        self.body.contains(&candidate)
    }

    /// Prepend a new head and keep the tail
    pub fn grow(&mut self, new_head: Position) {
        self.body.insert(0, new_head);
    }

    /// Prepend a new head and drop the tail
    pub fn move_to(&mut self, new_head: Position) {
        self.body.insert(0, new_head);
        self.body.pop();
    }

    pub fn occupied(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a round stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// The head ran into the body
    SelfCollision,
    /// No free cell was left for food
    BoardFull,
}

/// Where the round is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    RoundOver(RoundEnd),
}

/// Complete state of one round
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Committed direction of travel
    pub direction: Direction,
    pub food: Position,
    pub bonus: BonusTimer,
    pub bounds: GridBounds,
    /// Difficulty, already clamped to 1..=8
    pub level: u32,
    pub score: u32,
    /// Normal foods eaten this round
    pub eat_count: u32,
    pub steps: u32,
    pub phase: Phase,
    /// When the current pause began
    pub paused_at: Option<Instant>,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        direction: Direction,
        food: Position,
        bounds: GridBounds,
        level: u32,
    ) -> Self {
        Self {
            snake,
            direction,
            food,
            bonus: BonusTimer::Inactive,
            bounds,
            level,
            score: 0,
            eat_count: 0,
            steps: 0,
            phase: Phase::Playing,
            paused_at: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::RoundOver(_))
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.will_collide(pos)
    }

    /// Snake cells plus every food currently on the board
    pub fn occupied(&self) -> HashSet<Position> {
        let mut occupied = self.snake.occupied();
        occupied.insert(self.food);
        occupied.extend(self.bonus.food());
        occupied
    }
}
