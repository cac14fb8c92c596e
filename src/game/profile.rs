//! Game modes and the per-mode rules that distinguish them
use super::fruits::FruitSequence;
use super::levels::Walls;
use crate::consts;
use crate::daily::DailyKey;
use crate::rng::SeededRng;
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use rand::Rng;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Enum, Eq, PartialEq)]
pub(crate) enum Mode {
    #[default]
    Daily,
    Classic,
    Tutorial,
}

impl Mode {
    pub(crate) fn iter() -> impl Iterator<Item = Mode> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    /// The mode after this one on the menu, wrapping around
    pub(crate) fn next(self) -> Mode {
        Mode::from_usize((self.into_usize() + 1) % Self::LENGTH)
    }

    /// The mode before this one on the menu, wrapping around
    pub(crate) fn prev(self) -> Mode {
        Mode::from_usize((self.into_usize() + Self::LENGTH - 1) % Self::LENGTH)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Mode::Daily => "Daily Challenge",
            Mode::Classic => "Classic",
            Mode::Tutorial => "Tutorial",
        }
    }

    /// The key that selects this mode on the menu
    pub(crate) fn hotkey(self) -> char {
        match self {
            Mode::Daily => 'd',
            Mode::Classic => 'c',
            Mode::Tutorial => 't',
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The policies that vary from mode to mode
#[enum_dispatch]
pub(crate) trait Rules {
    fn mode(&self) -> Mode;

    /// The number of fruits that wins the game, if there is one
    fn target(&self) -> Option<u32>;

    /// The number of kiwis that will appear, if limited
    fn kiwi_quota(&self) -> Option<u32>;

    /// The fruit-cursor value at which the `n`th kiwi (counting from 1)
    /// becomes due, or `None` if there is no `n`th kiwi
    fn kiwi_threshold(&self, n: u32) -> Option<usize>;

    /// How many milliseconds each fruit takes off the tick interval
    fn speed_step(&self) -> u32;

    /// Does eating a kiwi lengthen the snake?
    fn kiwi_grows(&self) -> bool {
        false
    }

    /// The day whose saved progress this game reads & writes, if any
    fn daily_key(&self) -> Option<DailyKey> {
        None
    }

    /// Does dying throw away the run's score and fruit progress?
    fn death_resets_run(&self) -> bool {
        false
    }
}

#[enum_dispatch(Rules)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Profile {
    Daily(DailyRules),
    Classic(ClassicRules),
    Tutorial(TutorialRules),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DailyRules {
    key: DailyKey,
    target: u32,
    kiwis: u32,
}

impl Rules for DailyRules {
    fn mode(&self) -> Mode {
        Mode::Daily
    }

    fn target(&self) -> Option<u32> {
        Some(self.target)
    }

    fn kiwi_quota(&self) -> Option<u32> {
        Some(self.kiwis)
    }

    fn kiwi_threshold(&self, n: u32) -> Option<usize> {
        spread_threshold(self.target, self.kiwis, n)
    }

    fn speed_step(&self) -> u32 {
        target_speed_step(self.target)
    }

    fn daily_key(&self) -> Option<DailyKey> {
        Some(self.key)
    }
}

/// Endless play on a random board; the run ends at the first death
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ClassicRules;

impl Rules for ClassicRules {
    fn mode(&self) -> Mode {
        Mode::Classic
    }

    fn target(&self) -> Option<u32> {
        None
    }

    fn kiwi_quota(&self) -> Option<u32> {
        None
    }

    fn kiwi_threshold(&self, n: u32) -> Option<usize> {
        usize::try_from(n)
            .ok()?
            .checked_mul(consts::CLASSIC_KIWI_CADENCE)
    }

    fn speed_step(&self) -> u32 {
        consts::SPEED_DECREMENT
    }

    fn kiwi_grows(&self) -> bool {
        true
    }

    fn death_resets_run(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TutorialRules;

impl Rules for TutorialRules {
    fn mode(&self) -> Mode {
        Mode::Tutorial
    }

    fn target(&self) -> Option<u32> {
        Some(consts::TUTORIAL_TARGET)
    }

    fn kiwi_quota(&self) -> Option<u32> {
        Some(consts::TUTORIAL_KIWIS)
    }

    fn kiwi_threshold(&self, n: u32) -> Option<usize> {
        spread_threshold(consts::TUTORIAL_TARGET, consts::TUTORIAL_KIWIS, n)
    }

    fn speed_step(&self) -> u32 {
        target_speed_step(consts::TUTORIAL_TARGET)
    }
}

/// Spread `kiwis` kiwis evenly over a run of `target` fruits
fn spread_threshold(target: u32, kiwis: u32, n: u32) -> Option<usize> {
    if n == 0 || n > kiwis {
        return None;
    }
    let interval = (target / (kiwis + 1)).max(1);
    usize::try_from(interval * n).ok()
}

/// Speed up evenly enough to reach top speed right at the target
fn target_speed_step(target: u32) -> u32 {
    ((consts::INITIAL_SPEED - consts::MIN_SPEED) / target.max(1)).max(1)
}

/// Everything fixed at the start of a game: its rules, board, and fruits
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Level {
    pub(crate) profile: Profile,
    pub(crate) walls: Walls,
    pub(crate) fruits: FruitSequence,
}

impl Level {
    /// Build the puzzle for the day `key`.
    ///
    /// The target is drawn first, then whether it's a kiwi day, then how
    /// many kiwis, then the fruit sequence, all from one generator seeded
    /// with the day; changing that order changes every puzzle.
    pub(crate) fn daily(key: DailyKey, debug: bool) -> Level {
        let seed = key.seed();
        let mut rng = SeededRng::new(&seed);
        let (target, kiwis, walls) = if debug {
            (
                consts::DEBUG_TARGET,
                consts::DEBUG_KIWIS,
                Walls::from_iter([consts::DEBUG_WALL]),
            )
        } else {
            let target = rng.next_int(consts::MIN_FRUITS, consts::MAX_FRUITS);
            let kiwis = if rng.next() < consts::KIWI_DAY_PROBABILITY {
                rng.next_int(consts::MIN_KIWIS, consts::MAX_KIWIS)
            } else {
                0
            };
            (
                u32::try_from(target).unwrap_or(consts::DEBUG_TARGET),
                u32::try_from(kiwis).unwrap_or_default(),
                Walls::generate(&seed),
            )
        };
        let fruits = FruitSequence::seeded(&mut rng, consts::DAILY_SEQUENCE_LEN);
        log::info!(
            "Daily puzzle #{} ({key}): {target} fruits, {kiwis} kiwis, {} walls",
            key.number(),
            walls.len()
        );
        Level {
            profile: DailyRules {
                key,
                target,
                kiwis,
            }
            .into(),
            walls,
            fruits,
        }
    }

    /// Build a random Classic board
    pub(crate) fn classic<R: Rng>(rng: &mut R) -> Level {
        let seed = rng.random::<u64>().to_string();
        log::info!("Classic game with seed {seed}");
        let walls = Walls::generate(&seed);
        let fruits = FruitSequence::seeded(&mut SeededRng::new(&seed), consts::CLASSIC_SEQUENCE_LEN);
        Level {
            profile: ClassicRules.into(),
            walls,
            fruits,
        }
    }

    /// Build the tutorial: an open board with random fruits
    pub(crate) fn tutorial<R: Rng>(rng: &mut R) -> Level {
        Level {
            profile: TutorialRules.into(),
            walls: Walls::default(),
            fruits: FruitSequence::random(rng, consts::TUTORIAL_SEQUENCE_LEN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    fn day(n: u64) -> DailyKey {
        DailyKey::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Days::new(n))
    }

    #[test]
    fn mode_iter() {
        assert_eq!(
            Mode::iter().collect::<Vec<_>>(),
            [Mode::Daily, Mode::Classic, Mode::Tutorial]
        );
    }

    #[test]
    fn mode_cycling() {
        assert_eq!(Mode::Daily.next(), Mode::Classic);
        assert_eq!(Mode::Tutorial.next(), Mode::Daily);
        assert_eq!(Mode::Daily.prev(), Mode::Tutorial);
        assert_eq!(Mode::Classic.prev(), Mode::Daily);
    }

    #[test]
    fn daily_is_deterministic() {
        for n in 0..20 {
            assert_eq!(Level::daily(day(n), false), Level::daily(day(n), false));
        }
    }

    #[test]
    fn daily_targets_in_range() {
        for n in 0..200 {
            let level = Level::daily(day(n), false);
            let target = level.profile.target().unwrap();
            assert!((10..=20).contains(&target), "target {target} on day {n}");
            let kiwis = level.profile.kiwi_quota().unwrap();
            assert!(kiwis <= 3, "{kiwis} kiwis on day {n}");
            assert_eq!(level.fruits.len(), consts::DAILY_SEQUENCE_LEN);
        }
    }

    #[test]
    fn some_days_have_kiwis() {
        let kiwi_days = (0..200)
            .filter(|&n| Level::daily(day(n), false).profile.kiwi_quota() != Some(0))
            .count();
        assert!((20..=120).contains(&kiwi_days), "{kiwi_days} kiwi days of 200");
    }

    #[test]
    fn daily_draw_order() {
        let key = day(42);
        let mut rng = SeededRng::new(&key.seed());
        let target = rng.next_int(10, 20);
        if rng.next() < 0.3 {
            let _ = rng.next_int(1, 3);
        }
        let fruits = FruitSequence::seeded(&mut rng, 500);
        let level = Level::daily(key, false);
        assert_eq!(level.profile.target(), u32::try_from(target).ok());
        assert_eq!(level.fruits, fruits);
    }

    #[test]
    fn debug_daily() {
        let level = Level::daily(day(3), true);
        assert_eq!(level.profile.target(), Some(3));
        assert_eq!(level.profile.kiwi_quota(), Some(1));
        assert_eq!(level.walls, Walls::from_iter([consts::DEBUG_WALL]));
        // No draws are made for the target, so the fruits start the stream.
        let fruits = FruitSequence::seeded(&mut SeededRng::new(&day(3).seed()), 500);
        assert_eq!(level.fruits, fruits);
    }

    #[test]
    fn classic_levels_differ() {
        let mut rng = ChaCha12Rng::seed_from_u64(0x0123_4567_89AB_CDEF);
        let a = Level::classic(&mut rng);
        let b = Level::classic(&mut rng);
        assert_ne!(a.fruits, b.fruits);
        assert_eq!(a.fruits.len(), consts::CLASSIC_SEQUENCE_LEN);
        assert_eq!(a.profile.target(), None);
    }

    #[test]
    fn tutorial_level() {
        let mut rng = ChaCha12Rng::seed_from_u64(0x0123_4567_89AB_CDEF);
        let level = Level::tutorial(&mut rng);
        assert!(level.walls.is_empty());
        assert_eq!(level.fruits.len(), consts::TUTORIAL_SEQUENCE_LEN);
        assert_eq!(level.profile.target(), Some(3));
    }

    #[rstest]
    #[case(3, 23)]
    #[case(10, 7)]
    #[case(14, 5)]
    #[case(20, 3)]
    #[case(100, 1)]
    fn speed_steps(#[case] target: u32, #[case] step: u32) {
        assert_eq!(target_speed_step(target), step);
    }

    #[test]
    fn daily_kiwi_thresholds() {
        let rules = DailyRules {
            key: day(0),
            target: 14,
            kiwis: 3,
        };
        assert_eq!(rules.kiwi_threshold(0), None);
        assert_eq!(rules.kiwi_threshold(1), Some(3));
        assert_eq!(rules.kiwi_threshold(2), Some(6));
        assert_eq!(rules.kiwi_threshold(3), Some(9));
        assert_eq!(rules.kiwi_threshold(4), None);
    }

    #[test]
    fn small_target_thresholds() {
        // 3 / 4 rounds down to zero, so the interval is clamped to one fruit
        let rules = DailyRules {
            key: day(0),
            target: 3,
            kiwis: 3,
        };
        assert_eq!(rules.kiwi_threshold(1), Some(1));
        assert_eq!(rules.kiwi_threshold(2), Some(2));
        assert_eq!(rules.kiwi_threshold(3), Some(3));
    }

    #[test]
    fn no_kiwi_day() {
        let rules = DailyRules {
            key: day(0),
            target: 12,
            kiwis: 0,
        };
        assert_eq!(rules.kiwi_threshold(1), None);
    }

    #[test]
    fn classic_kiwi_thresholds() {
        assert_eq!(ClassicRules.kiwi_threshold(1), Some(15));
        assert_eq!(ClassicRules.kiwi_threshold(4), Some(60));
    }

    #[test]
    fn profile_policies() {
        let daily = Profile::from(DailyRules {
            key: day(0),
            target: 12,
            kiwis: 1,
        });
        let classic = Profile::from(ClassicRules);
        let tutorial = Profile::from(TutorialRules);
        assert_eq!(daily.daily_key(), Some(day(0)));
        assert_eq!(classic.daily_key(), None);
        assert_eq!(tutorial.daily_key(), None);
        assert!(classic.death_resets_run());
        assert!(!daily.death_resets_run());
        assert!(classic.kiwi_grows());
        assert!(!daily.kiwi_grows());
        assert!(!tutorial.kiwi_grows());
        assert_eq!(tutorial.mode(), Mode::Tutorial);
    }
}
