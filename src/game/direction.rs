use crate::consts::GRID_SIZE;
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Return the cell one step from `pos` in this direction.  The playing
    /// field is a torus: stepping off one edge lands on the opposite edge.
    pub(crate) fn advance(self, pos: Position) -> Position {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::North => y = decrement_wrapping(y, GRID_SIZE),
            Direction::East => x = increment_wrapping(x, GRID_SIZE),
            Direction::South => y = increment_wrapping(y, GRID_SIZE),
            Direction::West => x = decrement_wrapping(x, GRID_SIZE),
        }
        Position { x, y }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

fn decrement_wrapping(x: u16, max: u16) -> u16 {
    x.checked_sub(1).unwrap_or(max - 1)
}

fn increment_wrapping(x: u16, max: u16) -> u16 {
    x.checked_add(1).filter(|&xx| xx < max).unwrap_or(0)
}
