//! Generation of wall layouts
use super::direction::Direction;
use crate::consts::{self, GRID_SIZE};
use crate::rng::SeededRng;
use enum_map::Enum;
use ratatui::layout::{Position, Positions, Rect};
use std::collections::{HashSet, VecDeque};

/// An immutable set of lethal cells
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Walls(HashSet<Position>);

impl Walls {
    /// Generate the wall layout for `seed`.
    ///
    /// Each attempt draws from its own generator seeded with
    /// `"{seed}-{attempt}"`, picks a pattern, and keeps the result only if
    /// every free cell can reach every other one.  If no attempt succeeds, the
    /// board is left open.
    pub(crate) fn generate(seed: &str) -> Walls {
        for attempt in 0..consts::LEVEL_ATTEMPTS {
            let mut rng = SeededRng::new(&format!("{seed}-{attempt}"));
            let pattern = Pattern::from_usize(
                usize::try_from(rng.next_int(0, 3)).unwrap_or_default(),
            );
            let walls = Walls(
                pattern
                    .candidates(&mut rng)
                    .into_iter()
                    .filter(|&p| !in_spawn_area(p))
                    .collect(),
            );
            if walls.is_connected() {
                log::debug!(
                    "Level {seed:?}: {pattern:?} pattern, {} walls, attempt {attempt}",
                    walls.len()
                );
                return walls;
            }
        }
        log::warn!(
            "Failed to generate a connected level for {seed:?} after {} attempts; using an open board",
            consts::LEVEL_ATTEMPTS
        );
        Walls::default()
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.0.iter().copied()
    }

    /// Test whether the cells not covered by walls form a single region under
    /// four-way adjacency, with the edges of the grid wrapping around the same
    /// way the snake does.  A board with no free cells is not connected.
    pub(crate) fn is_connected(&self) -> bool {
        let free = grid_positions().filter(|p| !self.contains(*p)).count();
        let Some(start) = grid_positions().find(|p| !self.contains(*p)) else {
            return false;
        };
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            for q in neighbors(p) {
                if !self.contains(q) && seen.insert(q) {
                    queue.push_back(q);
                }
            }
        }
        seen.len() == free
    }
}

impl FromIterator<Position> for Walls {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Walls {
        Walls(iter.into_iter().collect())
    }
}

/// The families of layouts a level can be drawn from
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
enum Pattern {
    /// Single blocks scattered at random
    Scattered,
    /// Full-width parallel lines with random holes
    Lines,
    /// A rectangular ring inset from the edges, with a few gaps knocked out
    Ring,
    /// An outward spiral from the center with random holes
    Spiral,
}

impl Pattern {
    /// Produce the candidate wall cells for this pattern, in the order they
    /// are generated.  The list may contain duplicates and cells inside the
    /// spawn area; both are dealt with by the caller.
    ///
    /// The order of the draws from `rng` is part of every existing daily
    /// layout and must not change.
    fn candidates(self, rng: &mut SeededRng) -> Vec<Position> {
        match self {
            Pattern::Scattered => {
                let count = rng.next_int(10, 25);
                (0..count)
                    .map(|_| {
                        let x = rng.next_coord(GRID_SIZE);
                        let y = rng.next_coord(GRID_SIZE);
                        Position::new(x, y)
                    })
                    .collect()
            }
            Pattern::Lines => {
                let vertical = rng.next() > 0.5;
                let count = rng.next_int(2, 4);
                let mut cells = Vec::new();
                for _ in 0..count {
                    let fixed = u16::try_from(rng.next_int(2, i32::from(GRID_SIZE) - 3))
                        .unwrap_or_default();
                    for i in 0..GRID_SIZE {
                        if rng.next() > 0.2 {
                            cells.push(if vertical {
                                Position::new(fixed, i)
                            } else {
                                Position::new(i, fixed)
                            });
                        }
                    }
                }
                cells
            }
            Pattern::Ring => {
                let inset = u16::try_from(rng.next_int(3, 6)).unwrap_or(3);
                let far = GRID_SIZE - inset - 1;
                let mut cells = Vec::new();
                for x in inset..(GRID_SIZE - inset) {
                    cells.push(Position::new(x, inset));
                    cells.push(Position::new(x, far));
                }
                for y in inset..(GRID_SIZE - inset) {
                    cells.push(Position::new(inset, y));
                    cells.push(Position::new(far, y));
                }
                let gaps = rng.next_int(2, 4);
                for _ in 0..gaps {
                    if cells.is_empty() {
                        break;
                    }
                    let last = i32::try_from(cells.len() - 1).unwrap_or(i32::MAX);
                    let idx = usize::try_from(rng.next_int(0, last)).unwrap_or_default();
                    cells.remove(idx);
                    // Widen the gap by also removing the cell that slid into
                    // its place
                    if idx < cells.len() {
                        cells.remove(idx);
                    }
                }
                cells
            }
            Pattern::Spiral => {
                const STEPS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
                let size = i32::from(GRID_SIZE);
                let mut x = size / 2;
                let mut y = size / 2;
                let mut steps = 1;
                let mut heading = 0;
                let mut cells = Vec::new();
                for arm in 0..(size * 2) {
                    let (dx, dy) = STEPS[heading];
                    for _ in 0..steps {
                        x += dx;
                        y += dy;
                        if let (Ok(px), Ok(py)) = (u16::try_from(x), u16::try_from(y)) {
                            if px < GRID_SIZE && py < GRID_SIZE && rng.next() > 0.3 {
                                cells.push(Position::new(px, py));
                            }
                        }
                    }
                    heading = (heading + 1) % STEPS.len();
                    if arm % 2 == 0 {
                        steps += 1;
                    }
                }
                cells
            }
        }
    }
}

/// Is `pos` in the area around the snake's spawn point that must be kept
/// clear?
pub(crate) fn in_spawn_area(pos: Position) -> bool {
    pos.x.abs_diff(consts::SPAWN.x) <= consts::SPAWN_CLEARANCE_X
        && pos.y.abs_diff(consts::SPAWN.y) <= consts::SPAWN_CLEARANCE_Y
}

/// Iterate over every cell of the playing field, row by row
pub(crate) fn grid_positions() -> Positions {
    Rect::new(0, 0, GRID_SIZE, GRID_SIZE).positions()
}

/// The four cells adjacent to `pos` on the torus
fn neighbors(pos: Position) -> [Position; 4] {
    [
        Direction::North.advance(pos),
        Direction::South.advance(pos),
        Direction::West.advance(pos),
        Direction::East.advance(pos),
    ]
}
