use super::direction::Direction;
use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// The snake: its body on the grid and where it is heading
///
/// Turns requested between two moves are buffered, not applied: only the
/// latest request is kept, and it is checked against the direction the snake
/// is actually travelling in when the next move happens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The positions of all of the cells in the snake, head first
    body: VecDeque<Position>,

    /// The direction in which the snake is currently travelling
    direction: Direction,

    /// Direction requested since the last move, if any
    pending: Option<Direction>,

    /// How many moves remain in which the tail stays put
    owed_growth: usize,

    alive: bool,
}

impl Snake {
    /// Create a new snake of length
    /// [`INITIAL_SNAKE_LENGTH`][consts::INITIAL_SNAKE_LENGTH] with its head at
    /// [`SPAWN`][consts::SPAWN], heading north with its body trailing south.
    pub(crate) fn new() -> Snake {
        let body = (0..consts::INITIAL_SNAKE_LENGTH)
            .map(|i| Position::new(consts::SPAWN.x, consts::SPAWN.y + i))
            .collect();
        Snake {
            body,
            direction: Direction::North,
            pending: None,
            owed_growth: 0,
            alive: true,
        }
    }

    /// Create a live snake from explicit cells (head first) travelling in
    /// `direction`.  `body` must not be empty.
    #[cfg(test)]
    pub(crate) fn from_cells<I: IntoIterator<Item = Position>>(
        body: I,
        direction: Direction,
    ) -> Snake {
        let body = body.into_iter().collect::<VecDeque<_>>();
        assert!(!body.is_empty(), "snake body must not be empty");
        Snake {
            body,
            direction,
            pending: None,
            owed_growth: 0,
            alive: true,
        }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        // `body` is never empty
        self.body.front().copied().unwrap_or(consts::SPAWN)
    }

    /// Return the positions of the cells in the snake, head first
    pub(crate) fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn alive(&self) -> bool {
        self.alive
    }

    /// Request a turn on the next move, replacing any earlier request
    pub(crate) fn turn(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    /// Move the snake forwards one cell.
    ///
    /// If the new head lands on any cell the snake currently occupies
    /// (including the tail cell that would otherwise have been vacated), the
    /// snake dies and its body is left exactly as it was before the move.
    pub(crate) fn advance(&mut self) {
        if !self.alive {
            return;
        }
        if let Some(d) = self.pending.take().filter(|&d| d != self.direction.reverse()) {
            self.direction = d;
        }
        let new_head = self.direction.advance(self.head());
        if self.body.contains(&new_head) {
            self.alive = false;
            return;
        }
        self.body.push_front(new_head);
        if self.owed_growth > 0 {
            self.owed_growth -= 1;
        } else {
            let _ = self.body.pop_back();
        }
    }

    /// Lengthen the snake by one cell on its next move
    pub(crate) fn grow(&mut self) {
        self.owed_growth += 1;
    }

    /// Put the snake back in its starting state
    pub(crate) fn reset(&mut self) {
        *self = Snake::new();
    }
}

impl Default for Snake {
    fn default() -> Snake {
        Snake::new()
    }
}
