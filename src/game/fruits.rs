use crate::consts::{self, GRID_SIZE};
use crate::rng::SeededRng;
use rand::Rng;
use ratatui::layout::Position;

/// A fixed list of candidate fruit positions, consumed through a cursor
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct FruitSequence(Vec<Position>);

impl FruitSequence {
    /// Draw `len` positions from `rng`, x before y for each one
    pub(crate) fn seeded(rng: &mut SeededRng, len: usize) -> FruitSequence {
        FruitSequence(
            (0..len)
                .map(|_| {
                    let x = rng.next_coord(GRID_SIZE);
                    let y = rng.next_coord(GRID_SIZE);
                    Position::new(x, y)
                })
                .collect(),
        )
    }

    /// Draw `len` uniformly random positions
    pub(crate) fn random<R: Rng>(rng: &mut R, len: usize) -> FruitSequence {
        FruitSequence((0..len).map(|_| random_position(rng)).collect())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Return the entry at `index`, wrapping around once the end is reached
    pub(crate) fn get(&self, index: usize) -> Option<Position> {
        (!self.0.is_empty()).then(|| self.0[index % self.0.len()])
    }

    /// Search forwards from `cursor` for the first entry for which `free`
    /// returns true, examining at most
    /// [`FRUIT_LOOKAHEAD`][consts::FRUIT_LOOKAHEAD] entries.  On success,
    /// returns the entry and the cursor value just past it.
    pub(crate) fn next_free<F>(&self, cursor: usize, mut free: F) -> Option<(Position, usize)>
    where
        F: FnMut(Position) -> bool,
    {
        (cursor..cursor + consts::FRUIT_LOOKAHEAD)
            .filter_map(|i| Some((self.get(i)?, i + 1)))
            .find(|&(pos, _)| free(pos))
    }
}

/// Return a uniformly random cell of the playing field
pub(crate) fn random_position<R: Rng>(rng: &mut R) -> Position {
    Position::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE))
}

/// Try up to [`RANDOM_PLACEMENT_ATTEMPTS`][consts::RANDOM_PLACEMENT_ATTEMPTS]
/// uniformly random cells, returning the first for which `free` returns true
pub(crate) fn random_free_position<R, F>(rng: &mut R, mut free: F) -> Option<Position>
where
    R: Rng,
    F: FnMut(Position) -> bool,
{
    std::iter::repeat_with(|| random_position(rng))
        .take(consts::RANDOM_PLACEMENT_ATTEMPTS)
        .find(|&pos| free(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn seeded_is_deterministic() {
        let a = FruitSequence::seeded(&mut SeededRng::new("2025-5-5"), 500);
        let b = FruitSequence::seeded(&mut SeededRng::new("2025-5-5"), 500);
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
        assert!(a.0.iter().all(|p| p.x < GRID_SIZE && p.y < GRID_SIZE));
    }

    #[test]
    fn seeded_continues_stream() {
        let mut rng = SeededRng::new("2025-5-5");
        let _ = rng.next_int(10, 20);
        let after_draw = FruitSequence::seeded(&mut rng, 10);
        let fresh = FruitSequence::seeded(&mut SeededRng::new("2025-5-5"), 10);
        assert_ne!(after_draw, fresh);
    }

    #[test]
    fn get_wraps() {
        let seq = FruitSequence(vec![Position::new(1, 1), Position::new(2, 2)]);
        assert_eq!(seq.get(0), Some(Position::new(1, 1)));
        assert_eq!(seq.get(3), Some(Position::new(2, 2)));
        assert_eq!(FruitSequence::default().get(0), None);
    }

    #[test]
    fn next_free_skips_occupied() {
        let seq = FruitSequence(vec![
            Position::new(1, 1),
            Position::new(2, 2),
            Position::new(3, 3),
        ]);
        assert_eq!(
            seq.next_free(0, |p| p != Position::new(1, 1)),
            Some((Position::new(2, 2), 2))
        );
        assert_eq!(seq.next_free(2, |_| true), Some((Position::new(3, 3), 3)));
    }

    #[test]
    fn next_free_gives_up() {
        let seq = FruitSequence(vec![Position::new(1, 1); 100]);
        let mut examined = 0;
        let r = seq.next_free(0, |_| {
            examined += 1;
            false
        });
        assert_eq!(r, None);
        assert_eq!(examined, consts::FRUIT_LOOKAHEAD);
    }

    #[test]
    fn random_free_position_respects_predicate() {
        let mut rng = ChaCha12Rng::seed_from_u64(0x0123_4567_89AB_CDEF);
        for _ in 0..100 {
            let p = random_free_position(&mut rng, |p| p.x < 10).unwrap();
            assert!(p.x < 10);
        }
    }

    #[test]
    fn random_free_position_gives_up() {
        let mut rng = ChaCha12Rng::seed_from_u64(0x0123_4567_89AB_CDEF);
        assert_eq!(random_free_position(&mut rng, |_| false), None);
    }
}
