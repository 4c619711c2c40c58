/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the unit step (drow, dcol) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Everything the player asked for during one tick.
///
/// Produced by the input layer from raw key events; the engine never sees key
/// codes. An empty input means "keep going".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Requested turn, ignored if it reverses the current direction
    pub direction: Option<Direction>,
    /// Flip between playing and paused
    pub toggle_pause: bool,
}

impl TickInput {
    /// Input that requests nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Input that only toggles pause
    pub fn pause() -> Self {
        Self {
            direction: None,
            toggle_pause: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.direction.is_none() && !self.toggle_pause
    }
}

impl From<Direction> for TickInput {
    fn from(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            toggle_pause: false,
        }
    }
}
