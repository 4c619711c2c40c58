//! Choosing the character drawn for each snake cell.
//!
//! A body cell's shape comes from its two neighbours along the body: the one
//! nearer the head (`prev`) and the one nearer the tail (`next`). Straight runs
//! are horizontal or vertical; turns pick one of four corners from the signs
//! of the two displacements. The corner choice depends on traversal order, so
//! swapping `prev` and `next` gives the diagonally opposite corner.
//!
//! The corner table is the classic one from the terminal snake this game
//! reproduces, and it weighs rows against columns the other way round from
//! the box-drawing shapes: a cell with the head-side neighbour above and the
//! tail-side neighbour to its left draws `╚`, where box drawing would use
//! `╝`. Keep the table as it is: it is what gives the traversal-order
//! symmetry above, and the tests pin it.

use super::action::Direction;
use super::grid::{GridBounds, unwrap_near};
use super::state::Position;

/// Shape of a single snake cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Horizontal,
    Vertical,
    BottomLeft,
    TopLeft,
    BottomRight,
    TopRight,
    Head(Direction),
    /// Tail, named by which side of the next segment it sits on
    Tail(Direction),
    /// A body cell whose neighbours do not form a valid shape
    Segment,
    /// A tail with no distinct neighbour
    Stub,
}

impl Glyph {
    pub fn symbol(&self) -> char {
        match self {
            Glyph::Horizontal => '═',
            Glyph::Vertical => '║',
            Glyph::BottomLeft => '╔',
            Glyph::TopLeft => '╚',
            Glyph::BottomRight => '╗',
            Glyph::TopRight => '╝',
            Glyph::Head(Direction::Up) => 'Λ',
            Glyph::Head(Direction::Down) => 'V',
            Glyph::Head(Direction::Left) => '<',
            Glyph::Head(Direction::Right) => '>',
            Glyph::Tail(Direction::Up) => '^',
            Glyph::Tail(Direction::Down) => 'v',
            Glyph::Tail(Direction::Left) => '<',
            Glyph::Tail(Direction::Right) => '>',
            Glyph::Segment => 'O',
            Glyph::Stub => 'o',
        }
    }
}

/// Shape of a body cell from its neighbours, all given in plain (unwrapped)
/// coordinates.
pub fn segment_glyph(prev: Position, current: Position, next: Position) -> Glyph {
    let (p, c, n) = (prev, current, next);

    if p.row == c.row && c.row == n.row {
        return Glyph::Horizontal;
    }
    if p.col == c.col && c.col == n.col {
        return Glyph::Vertical;
    }

    if (c.row > p.row && c.col < n.col) || (c.row < n.row && c.col > p.col) {
        Glyph::BottomLeft
    } else if (c.row > p.row && c.col > n.col) || (c.row < n.row && c.col < p.col) {
        Glyph::TopLeft
    } else if (c.row < p.row && c.col < n.col) || (c.row > n.row && c.col > p.col) {
        Glyph::BottomRight
    } else if (c.row < p.row && c.col > n.col) || (c.row > n.row && c.col < p.col) {
        Glyph::TopRight
    } else {
        Glyph::Segment
    }
}

/// The head only reflects where the snake is heading
pub fn head_glyph(direction: Direction) -> Glyph {
    Glyph::Head(direction)
}

/// Shape of the tail from its position relative to the segment before it
pub fn tail_glyph(tail: Position, second_last: Position) -> Glyph {
    if tail.col < second_last.col {
        Glyph::Tail(Direction::Left)
    } else if tail.col > second_last.col {
        Glyph::Tail(Direction::Right)
    } else if tail.row < second_last.row {
        Glyph::Tail(Direction::Up)
    } else if tail.row > second_last.row {
        Glyph::Tail(Direction::Down)
    } else {
        Glyph::Stub
    }
}

/// One glyph per segment, head first.
///
/// Neighbours that sit on the far side of a wrapped edge are brought next to
/// their cell before comparing, so a body crossing an edge keeps its shape.
pub fn body_glyphs(body: &[Position], direction: Direction, bounds: GridBounds) -> Vec<Glyph> {
    let last = body.len().saturating_sub(1);

    body.iter()
        .enumerate()
        .map(|(i, &current)| {
            if i == 0 {
                head_glyph(direction)
            } else if i == last {
                tail_glyph(current, unwrap_near(current, body[i - 1], bounds))
            } else {
                segment_glyph(
                    unwrap_near(current, body[i - 1], bounds),
                    current,
                    unwrap_near(current, body[i + 1], bounds),
                )
            }
        })
        .collect()
}
