//! A tiny deterministic PRNG seeded from a string.
//!
//! Every client has to derive the same puzzle from the same day, so the hash
//! and the generator below must stay exactly as they are: changing either one
//! changes every daily layout.

/// Multiplier for folding each UTF-16 code unit of the seed into the state
const HASH_MULTIPLIER: u32 = 2_654_435_761;

/// Starting value for the string hash
const HASH_BASIS: u32 = 0xdead_beef;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// 2^32, the modulus of the generator
const LCG_MODULUS: f64 = 4_294_967_296.0;

/// A linear congruential generator whose initial state is a hash of a string
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub(crate) fn new(seed: &str) -> SeededRng {
        let h = seed.encode_utf16().fold(HASH_BASIS, |h, c| {
            (h ^ u32::from(c)).wrapping_mul(HASH_MULTIPLIER)
        });
        SeededRng {
            state: h ^ (h >> 16),
        }
    }

    /// Return a float in `[0, 1)`
    pub(crate) fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        f64::from(self.state) / LCG_MODULUS
    }

    /// Return an integer in `min..=max`.
    ///
    /// `max` must not be less than `min`.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn next_int(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "next_int() called with min > max");
        let span = f64::from(max) - f64::from(min) + 1.0;
        // The product is in `[0, span)`, so the floor always fits.
        (self.next() * span).floor() as i32 + min
    }

    /// Return a grid coordinate in `0..size`
    pub(crate) fn next_coord(&mut self, size: u16) -> u16 {
        let max = i32::from(size) - 1;
        u16::try_from(self.next_int(0, max)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new("2025-3-7");
        let mut b = SeededRng::new("2025-3-7");
        for _ in 0..1000 {
            assert_eq!(a.next_int(-5, 17), b.next_int(-5, 17));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRng::new("2025-3-7");
        let mut b = SeededRng::new("2025-3-8");
        let xs = (0..16).map(|_| a.next_int(0, 1000)).collect::<Vec<_>>();
        let ys = (0..16).map(|_| b.next_int(0, 1000)).collect::<Vec<_>>();
        assert_ne!(xs, ys);
    }

    #[test]
    fn lcg_step() {
        let mut rng = SeededRng { state: 0 };
        let x = rng.next();
        assert_eq!(rng.state, LCG_INCREMENT);
        assert!((x - f64::from(LCG_INCREMENT) / LCG_MODULUS).abs() < f64::EPSILON);
        let _ = rng.next();
        assert_eq!(
            rng.state,
            LCG_INCREMENT
                .wrapping_mul(LCG_MULTIPLIER)
                .wrapping_add(LCG_INCREMENT)
        );
    }

    #[test]
    fn empty_seed_hash() {
        let rng = SeededRng::new("");
        assert_eq!(rng.state, HASH_BASIS ^ (HASH_BASIS >> 16));
    }

    #[test]
    fn next_is_unit_interval() {
        let mut rng = SeededRng::new("unit");
        for _ in 0..10_000 {
            let x = rng.next();
            assert!((0.0..1.0).contains(&x), "{x} out of range");
        }
    }

    #[rstest]
    #[case("2024-1-1", 0, 3)]
    #[case("2024-12-31", 10, 20)]
    #[case("classic", 0, 19)]
    #[case("x", -3, 3)]
    #[case("y", 7, 7)]
    fn next_int_in_range(#[case] seed: &str, #[case] min: i32, #[case] max: i32) {
        let mut rng = SeededRng::new(seed);
        for _ in 0..2000 {
            let n = rng.next_int(min, max);
            assert!((min..=max).contains(&n), "{n} not in {min}..={max}");
        }
    }

    #[test]
    fn next_int_covers_range() {
        let mut rng = SeededRng::new("coverage");
        let mut seen = [false; 4];
        for _ in 0..200 {
            let n = usize::try_from(rng.next_int(0, 3)).unwrap();
            seen[n] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn next_coord_in_grid() {
        let mut rng = SeededRng::new("coords");
        for _ in 0..2000 {
            assert!(rng.next_coord(20) < 20);
        }
    }
}
