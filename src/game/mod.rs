mod direction;
mod fruits;
mod levels;
mod profile;
mod render;
mod snake;
mod timer;
pub(crate) use self::direction::Direction;
pub(crate) use self::profile::Mode;
pub(crate) use self::render::SessionView;
use self::fruits::random_free_position;
use self::levels::Walls;
use self::profile::{Level, Rules};
use self::snake::Snake;
use self::timer::{Stopwatch, Timer};
use crate::consts;
use crate::daily::DailyKey;
use crate::progress::{DailyRecord, Progress};
use rand::{rngs::ThreadRng, Rng};
use ratatui::layout::Position;
use std::time::{Duration, Instant};

/// Where a session is in its lifecycle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// Choosing a mode
    Start,
    /// Counting down to play; the value is the number shown
    Countdown(u8),
    Playing,
    Death,
    Victory,
}

/// The scheduled tasks a session can have pending
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Event {
    Countdown,
    Tick,
    KiwiExpiry,
}

/// One player's run of the game, from mode selection through death or
/// victory and back.
///
/// The session never reads the clock; every entry point that depends on time
/// is told what time it is, and [`GameSession::update()`] fires whatever
/// became due by then.
#[derive(Debug)]
pub(crate) struct GameSession<R = ThreadRng> {
    rng: R,
    progress: Progress,
    today: DailyKey,
    debug: bool,

    mode: Mode,
    phase: Phase,
    level: Level,
    snake: Snake,
    fruit: Option<Position>,
    kiwi: Option<Position>,

    /// Index into the fruit sequence of the next candidate position
    cursor: usize,

    /// Fruits eaten this run
    score: u32,

    /// Points from kiwis
    bonus: u32,

    lives: u32,
    kiwis_spawned: u32,
    kiwi_count: u32,

    /// Time between moves, in milliseconds
    speed: u32,

    /// Replaying a finished daily puzzle: nothing is saved
    practice: bool,

    /// Whether the last Classic death set a new high score
    new_high_score: bool,

    tick: Timer,
    countdown: Timer,
    kiwi_expiry: Timer,
    stopwatch: Stopwatch,
}

impl GameSession<ThreadRng> {
    pub(crate) fn new(progress: Progress, today: DailyKey, debug: bool) -> Self {
        GameSession::new_with_rng(progress, today, debug, rand::rng())
    }
}

impl<R: Rng> GameSession<R> {
    pub(crate) fn new_with_rng(
        progress: Progress,
        today: DailyKey,
        debug: bool,
        rng: R,
    ) -> GameSession<R> {
        GameSession {
            rng,
            progress,
            today,
            debug,
            mode: Mode::default(),
            phase: Phase::Start,
            level: Level::daily(today, debug),
            snake: Snake::new(),
            fruit: None,
            kiwi: None,
            cursor: 0,
            score: 0,
            bonus: 0,
            lives: 0,
            kiwis_spawned: 0,
            kiwi_count: 0,
            speed: consts::INITIAL_SPEED,
            practice: false,
            new_high_score: false,
            tick: Timer::default(),
            countdown: Timer::default(),
            kiwi_expiry: Timer::default(),
            stopwatch: Stopwatch::default(),
        }
    }

    /// Choose the mode that [`GameSession::begin()`] will start.  Ignored
    /// outside the start screen.
    pub(crate) fn select_mode(&mut self, mode: Mode) {
        if self.phase == Phase::Start {
            self.mode = mode;
        }
    }

    /// Start the selected mode.
    ///
    /// A daily puzzle that's already been solved goes straight to the victory
    /// screen with the saved figures.  One that was started but not finished
    /// picks up where it left off at the cost of a life.
    pub(crate) fn begin(&mut self, now: Instant) {
        if self.phase != Phase::Start {
            return;
        }
        log::debug!("Beginning {} game", self.mode);
        self.level = self.build_level();
        self.reset_run();
        if let Some(key) = self.level.profile.daily_key() {
            match self.progress.daily(key) {
                Some(record) if record.completed => {
                    log::info!("Daily puzzle {key} is already solved");
                    self.restore(&record);
                    self.lives = record.lives;
                    self.phase = Phase::Victory;
                    return;
                }
                Some(record) => {
                    self.restore(&record);
                    self.lives = record.lives.saturating_add(1);
                    log::info!(
                        "Resuming daily puzzle {key} at {} fruits; lives now {}",
                        self.score,
                        self.lives
                    );
                    self.persist(now, false);
                }
                None => (),
            }
        }
        self.start_countdown(now);
    }

    /// Steer the snake.  Only has an effect while playing.
    pub(crate) fn change_direction(&mut self, direction: Direction) {
        if self.phase == Phase::Playing {
            self.snake.turn(direction);
        }
    }

    /// Leave the death screen and try again
    pub(crate) fn dismiss_death(&mut self, now: Instant) {
        if self.phase != Phase::Death {
            return;
        }
        self.snake.reset();
        if self.level.profile.death_resets_run() {
            let lives = self.lives;
            self.reset_run();
            self.lives = lives;
        }
        self.start_countdown(now);
    }

    /// Leave the victory screen and play the same mode again from scratch.
    /// Replaying a solved daily puzzle doesn't touch its saved record.
    pub(crate) fn replay(&mut self, now: Instant) {
        if self.phase != Phase::Victory {
            return;
        }
        self.level = self.build_level();
        self.reset_run();
        self.practice = self
            .level
            .profile
            .daily_key()
            .and_then(|key| self.progress.daily(key))
            .is_some_and(|record| record.completed);
        self.start_countdown(now);
    }

    /// Abandon whatever's going on and go back to the start screen
    pub(crate) fn return_to_menu(&mut self) {
        self.cancel_timers();
        self.kiwi = None;
        self.phase = Phase::Start;
    }

    /// Fire every scheduled event due at or before `now`, earliest first.
    /// Each event is processed as though it happened exactly on schedule,
    /// except that a tick running more than a full interval behind is taken
    /// at `now`, so a stall costs the player at most one move.
    pub(crate) fn update(&mut self, now: Instant) {
        while let Some((event, when)) = self.next_due(now) {
            match event {
                Event::Countdown => self.countdown_step(when),
                Event::Tick if now.saturating_duration_since(when) > self.tick_interval() => {
                    log::debug!("Tick running late; skipping the backlog");
                    self.tick(now);
                }
                Event::Tick => self.tick(when),
                Event::KiwiExpiry => self.expire_kiwi(),
            }
        }
    }

    fn next_due(&self, now: Instant) -> Option<(Event, Instant)> {
        [
            (Event::Countdown, self.countdown.due(now)),
            (Event::Tick, self.tick.due(now)),
            (Event::KiwiExpiry, self.kiwi_expiry.due(now)),
        ]
        .into_iter()
        .filter_map(|(ev, when)| Some((ev, when?)))
        .min_by_key(|&(_, when)| when)
    }

    fn build_level(&mut self) -> Level {
        match self.mode {
            Mode::Daily => Level::daily(self.today, self.debug),
            Mode::Classic => Level::classic(&mut self.rng),
            Mode::Tutorial => Level::tutorial(&mut self.rng),
        }
    }

    /// Clear everything about the current run except the level
    fn reset_run(&mut self) {
        self.cancel_timers();
        self.snake.reset();
        self.fruit = None;
        self.kiwi = None;
        self.cursor = 0;
        self.score = 0;
        self.bonus = 0;
        self.lives = 0;
        self.kiwis_spawned = 0;
        self.kiwi_count = 0;
        self.speed = consts::INITIAL_SPEED;
        self.practice = false;
        self.new_high_score = false;
        self.stopwatch = Stopwatch::default();
    }

    /// Load a saved daily run's figures (other than lives)
    fn restore(&mut self, record: &DailyRecord) {
        self.score = record.score;
        self.cursor = usize::try_from(record.score).unwrap_or_default();
        self.kiwi_count = record.kiwi_count;
        self.kiwis_spawned = record.kiwi_count;
        self.bonus = record.kiwi_count.saturating_mul(consts::KIWI_BONUS);
        self.speed = speed_for_score(self.level.profile.speed_step(), record.score);
        self.stopwatch = Stopwatch::with_elapsed(Duration::from_secs(record.elapsed_time));
    }

    fn start_countdown(&mut self, now: Instant) {
        self.cancel_timers();
        self.phase = Phase::Countdown(consts::COUNTDOWN_FROM);
        self.countdown.schedule(now + consts::COUNTDOWN_STEP);
    }

    fn countdown_step(&mut self, when: Instant) {
        self.countdown.cancel();
        match self.phase {
            Phase::Countdown(n) if n > 1 => {
                self.phase = Phase::Countdown(n - 1);
                self.countdown.schedule(when + consts::COUNTDOWN_STEP);
            }
            Phase::Countdown(_) => self.start_playing(when),
            _ => (),
        }
    }

    fn start_playing(&mut self, now: Instant) {
        self.phase = Phase::Playing;
        if self.fruit.is_none_or(|pos| self.snake.contains(pos)) {
            self.fruit = None;
            self.spawn_fruit();
        }
        self.schedule_tick(now);
        self.stopwatch.start(now);
        self.check_kiwi(now);
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.speed))
    }

    fn schedule_tick(&mut self, now: Instant) {
        self.tick.schedule(now + self.tick_interval());
    }

    fn tick(&mut self, when: Instant) {
        self.tick.cancel();
        if self.phase != Phase::Playing {
            return;
        }
        self.snake.advance();
        if !self.snake.alive() {
            self.die(when);
            return;
        }
        let head = self.snake.head();
        if self.fruit == Some(head) {
            self.fruit = None;
            self.snake.grow();
            self.score += 1;
            self.speed = self
                .speed
                .saturating_sub(self.level.profile.speed_step())
                .max(consts::MIN_SPEED);
            if self.level.profile.target().is_some_and(|t| self.score >= t) {
                self.win(when);
                return;
            }
            self.persist(when, false);
            self.spawn_fruit();
        }
        if self.level.walls.contains(head) {
            self.die(when);
            return;
        }
        if self.kiwi == Some(head) {
            self.eat_kiwi(when);
        }
        if self.fruit.is_none() {
            self.spawn_fruit();
        }
        self.check_kiwi(when);
        self.schedule_tick(when);
    }

    fn die(&mut self, when: Instant) {
        self.lives = self.lives.saturating_add(1);
        self.phase = Phase::Death;
        self.cancel_timers();
        self.stopwatch.stop(when);
        self.kiwi = None;
        log::debug!(
            "Died at {:?} with {} fruits; lives now {}",
            self.snake.head(),
            self.score,
            self.lives
        );
        self.persist(when, false);
        if self.mode == Mode::Classic {
            self.new_high_score = self
                .progress
                .record_classic_score(self.score.saturating_add(self.bonus));
        }
    }

    fn win(&mut self, when: Instant) {
        self.phase = Phase::Victory;
        self.cancel_timers();
        self.stopwatch.stop(when);
        self.kiwi = None;
        log::info!(
            "{} won with {} fruits and {} kiwis",
            self.mode,
            self.score,
            self.kiwi_count
        );
        self.persist(when, true);
        if self.mode == Mode::Tutorial {
            self.progress.set_played_tutorial();
        }
    }

    /// Save the current daily run, if this is one that gets saved
    fn persist(&mut self, now: Instant, completed: bool) {
        if self.practice {
            return;
        }
        let Some(key) = self.level.profile.daily_key() else {
            return;
        };
        let record = DailyRecord {
            score: self.score,
            lives: self.lives,
            elapsed_time: self.stopwatch.elapsed(now).as_secs(),
            kiwi_count: self.kiwi_count,
            completed,
            target_fruits: self.level.profile.target().unwrap_or_default(),
            total_kiwis: self.level.profile.kiwi_quota().unwrap_or_default(),
        };
        self.progress.save_daily(key, &record);
    }

    /// Put the next fruit on the board: the first free cell in the sequence
    /// within reach of the cursor or, failing that, a random free cell.  If
    /// neither works out, the board stays fruitless until the next tick.
    fn spawn_fruit(&mut self) {
        let snake = &self.snake;
        let walls = &self.level.walls;
        let kiwi = self.kiwi;
        let free = |pos: Position| !snake.contains(pos) && !walls.contains(pos) && kiwi != Some(pos);
        if let Some((pos, cursor)) = self.level.fruits.next_free(self.cursor, free) {
            self.fruit = Some(pos);
            self.cursor = cursor;
        } else if let Some(pos) = random_free_position(&mut self.rng, free) {
            log::debug!("Fruit sequence blocked at {}; placing fruit randomly", self.cursor);
            self.fruit = Some(pos);
        } else {
            log::debug!("No room for a fruit; will try again next tick");
        }
    }

    /// Spawn a kiwi if one is due
    fn check_kiwi(&mut self, now: Instant) {
        if self.kiwi.is_some() {
            return;
        }
        let Some(threshold) = self
            .level
            .profile
            .kiwi_threshold(self.kiwis_spawned.saturating_add(1))
        else {
            return;
        };
        if self.cursor < threshold {
            return;
        }
        self.kiwis_spawned += 1;
        let snake = &self.snake;
        let walls = &self.level.walls;
        let fruit = self.fruit;
        let free = |pos: Position| !snake.contains(pos) && !walls.contains(pos) && fruit != Some(pos);
        if let Some(pos) = random_free_position(&mut self.rng, free) {
            log::debug!("Kiwi #{} appears at {pos:?}", self.kiwis_spawned);
            self.kiwi = Some(pos);
            self.kiwi_expiry.schedule(now + consts::KIWI_LIFETIME);
        } else {
            log::debug!("No room for kiwi #{}; skipping it", self.kiwis_spawned);
        }
    }

    fn eat_kiwi(&mut self, when: Instant) {
        self.kiwi = None;
        self.kiwi_expiry.cancel();
        self.kiwi_count += 1;
        self.bonus = self.bonus.saturating_add(consts::KIWI_BONUS);
        if self.level.profile.kiwi_grows() {
            self.snake.grow();
        }
        self.persist(when, false);
    }
}

impl<R> GameSession<R> {
    /// The earliest instant at which [`GameSession::update()`] has something
    /// to do, if any
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        [self.countdown, self.tick, self.kiwi_expiry]
            .into_iter()
            .filter_map(|t| t.deadline())
            .min()
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn fruit(&self) -> Option<Position> {
        self.fruit
    }

    pub(crate) fn kiwi(&self) -> Option<Position> {
        self.kiwi
    }

    pub(crate) fn walls(&self) -> &Walls {
        &self.level.walls
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn bonus(&self) -> u32 {
        self.bonus
    }

    pub(crate) fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) fn elapsed(&self, now: Instant) -> Duration {
        self.stopwatch.elapsed(now)
    }

    pub(crate) fn target(&self) -> Option<u32> {
        self.level.profile.target()
    }

    pub(crate) fn kiwi_quota(&self) -> Option<u32> {
        self.level.profile.kiwi_quota()
    }

    pub(crate) fn kiwi_count(&self) -> u32 {
        self.kiwi_count
    }

    pub(crate) fn today(&self) -> DailyKey {
        self.today
    }

    pub(crate) fn practice(&self) -> bool {
        self.practice
    }

    pub(crate) fn new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub(crate) fn classic_high_score(&self) -> u32 {
        self.progress.classic_high_score()
    }

    pub(crate) fn has_played_tutorial(&self) -> bool {
        self.progress.has_played_tutorial()
    }

    /// The saved state of today's puzzle, for the start screen
    pub(crate) fn daily_record(&self) -> Option<DailyRecord> {
        self.progress.daily(self.today)
    }

    fn cancel_timers(&mut self) {
        self.tick.cancel();
        self.countdown.cancel();
        self.kiwi_expiry.cancel();
    }

    fn expire_kiwi(&mut self) {
        self.kiwi_expiry.cancel();
        if let Some(pos) = self.kiwi.take() {
            log::debug!("Kiwi at {pos:?} expired");
        }
    }
}

/// The tick interval after `score` fruits at `step` milliseconds apiece
fn speed_for_score(step: u32, score: u32) -> u32 {
    consts::INITIAL_SPEED
        .saturating_sub(step.saturating_mul(score))
        .max(consts::MIN_SPEED)
}
