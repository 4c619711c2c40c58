//! Grid dimensions and toroidal coordinate arithmetic

use super::error::GameError;
use super::state::Position;

/// Rows kept free below the playfield for the separator and the status line
pub const RESERVED_ROWS: u16 = 2;

/// Playable area of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridBounds {
    height: u16,
    width: u16,
}

impl GridBounds {
    /// Create bounds, rejecting a zero dimension
    pub fn new(height: u16, width: u16) -> Result<Self, GameError> {
        if height == 0 || width == 0 {
            return Err(GameError::InvalidBounds { height, width });
        }
        Ok(Self { height, width })
    }

    /// Bounds for a terminal of the given size, minus the reserved rows
    pub fn for_terminal(cols: u16, rows: u16) -> Result<Self, GameError> {
        Self::new(rows.saturating_sub(RESERVED_ROWS), cols)
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of cells in the grid
    pub fn area(&self) -> usize {
        usize::from(self.height) * usize::from(self.width)
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..i32::from(self.height)).contains(&pos.row) && (0..i32::from(self.width)).contains(&pos.col)
    }

    /// Every cell, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = i32::from(self.width);
        (0..i32::from(self.height))
            .flat_map(move |row| (0..width).map(move |col| Position::new(row, col)))
    }
}

/// Bring a position back onto the grid, wrapping each axis independently
pub fn wrap(pos: Position, bounds: GridBounds) -> Position {
    Position::new(
        pos.row.rem_euclid(i32::from(bounds.height)),
        pos.col.rem_euclid(i32::from(bounds.width)),
    )
}

/// Shift `neighbor` by whole grid lengths so it sits next to `anchor`.
///
/// Adjacent body cells that straddle an edge are stored on opposite sides of
/// the grid; this undoes the wrap so their displacement is a unit step again.
pub fn unwrap_near(anchor: Position, neighbor: Position, bounds: GridBounds) -> Position {
    Position::new(
        nearest(anchor.row, neighbor.row, i32::from(bounds.height)),
        nearest(anchor.col, neighbor.col, i32::from(bounds.width)),
    )
}

fn nearest(anchor: i32, value: i32, len: i32) -> i32 {
    let diff = value - anchor;
    if diff > len / 2 {
        value - len
    } else if diff < -(len / 2) {
        value + len
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(height: u16, width: u16) -> GridBounds {
        GridBounds::new(height, width).unwrap()
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert_eq!(
            GridBounds::new(0, 10),
            Err(GameError::InvalidBounds {
                height: 0,
                width: 10
            })
        );
        assert!(GridBounds::new(10, 0).is_err());
        assert!(GridBounds::new(1, 1).is_ok());
    }

    #[test]
    fn test_terminal_bounds_reserve_status_rows() {
        let b = GridBounds::for_terminal(80, 24).unwrap();
        assert_eq!(b.height(), 22);
        assert_eq!(b.width(), 80);

        // Nothing left to play on
        assert!(GridBounds::for_terminal(80, 2).is_err());
    }

    #[test]
    fn test_wrap_each_edge() {
        let b = bounds(20, 40);
        assert_eq!(wrap(Position::new(-1, 5), b), Position::new(19, 5));
        assert_eq!(wrap(Position::new(20, 5), b), Position::new(0, 5));
        assert_eq!(wrap(Position::new(5, -1), b), Position::new(5, 39));
        assert_eq!(wrap(Position::new(5, 40), b), Position::new(5, 0));
        assert_eq!(wrap(Position::new(-1, 40), b), Position::new(19, 0));
    }

    #[test]
    fn test_wrap_always_in_bounds() {
        for (h, w) in [(1, 1), (3, 7), (20, 40)] {
            let b = bounds(h, w);
            for row in -50..50 {
                for col in -90..90 {
                    let p = wrap(Position::new(row, col), b);
                    assert!(b.contains(p), "{:?} escaped {}x{}", p, h, w);
                }
            }
        }
    }

    #[test]
    fn test_wrap_leaves_inside_positions_alone() {
        let b = bounds(20, 40);
        for pos in b.positions() {
            assert_eq!(wrap(pos, b), pos);
        }
    }

    #[test]
    fn test_positions_cover_grid() {
        let b = bounds(3, 4);
        let all: Vec<_> = b.positions().collect();
        assert_eq!(all.len(), b.area());
        assert_eq!(all[0], Position::new(0, 0));
        assert_eq!(all[11], Position::new(2, 3));
    }

    #[test]
    fn test_unwrap_near_across_edges() {
        let b = bounds(20, 40);
        let anchor = Position::new(10, 0);
        assert_eq!(unwrap_near(anchor, Position::new(10, 39), b), Position::new(10, -1));
        assert_eq!(unwrap_near(anchor, Position::new(10, 1), b), Position::new(10, 1));

        let anchor = Position::new(19, 5);
        assert_eq!(unwrap_near(anchor, Position::new(0, 5), b), Position::new(20, 5));
    }
}
