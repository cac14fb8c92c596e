use crate::command::Command;
use crate::consts;
use crate::game::{Direction, GameSession, Mode, Phase, SessionView};
use chrono::Utc;
use crossterm::event::{poll, read, Event};
use rand::{rngs::ThreadRng, Rng};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::Instant;

/// The terminal front end: draws the session and feeds it keypresses & the
/// passage of time
#[derive(Debug)]
pub(crate) struct App<R = ThreadRng> {
    session: GameSession<R>,
    quitting: bool,
}

impl<R: Rng> App<R> {
    pub(crate) fn new(session: GameSession<R>) -> App<R> {
        App {
            session,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            let now = Instant::now();
            self.session.update(now);
            terminal.draw(|frame| {
                frame.render_widget(
                    SessionView::new(&self.session, now, Utc::now()),
                    frame.area(),
                );
            })?;
            self.process_input()?;
        }
        Ok(())
    }

    /// Wait for input until the session next has something to do, or until
    /// it's time to redraw the clock, whichever comes first
    fn process_input(&mut self) -> io::Result<()> {
        let wait = self.session.next_deadline().map_or(consts::REDRAW_PERIOD, |when| {
            when.saturating_duration_since(Instant::now())
                .min(consts::REDRAW_PERIOD)
        });
        if poll(wait)? {
            self.handle_event(&read()?, Instant::now());
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, now: Instant) {
        let Some(cmd) = event
            .as_key_press_event()
            .and_then(Command::from_key_event)
        else {
            return;
        };
        let s = &mut self.session;
        match (s.phase(), cmd) {
            (_, Command::Quit | Command::Q) => self.quitting = true,
            (Phase::Start, Command::Up) => s.select_mode(s.mode().prev()),
            (Phase::Start, Command::Down) => s.select_mode(s.mode().next()),
            (Phase::Start, Command::Enter | Command::Space) => s.begin(now),
            (Phase::Start, Command::D | Command::C | Command::T) => {
                s.select_mode(match cmd {
                    Command::C => Mode::Classic,
                    Command::T => Mode::Tutorial,
                    _ => Mode::Daily,
                });
                s.begin(now);
            }
            (Phase::Start, _) => (),
            (Phase::Countdown(_) | Phase::Playing, Command::Up) => {
                s.change_direction(Direction::North);
            }
            (Phase::Countdown(_) | Phase::Playing, Command::Down) => {
                s.change_direction(Direction::South);
            }
            (Phase::Countdown(_) | Phase::Playing, Command::Left) => {
                s.change_direction(Direction::West);
            }
            // 'd' is the wasd key for right once a game is going
            (Phase::Countdown(_) | Phase::Playing, Command::Right | Command::D) => {
                s.change_direction(Direction::East);
            }
            (Phase::Death, Command::Enter | Command::Space) => s.dismiss_death(now),
            (Phase::Victory, Command::R) => s.replay(now),
            (Phase::Victory, Command::C) => {
                s.return_to_menu();
                s.select_mode(Mode::Classic);
                s.begin(now);
            }
            (_, Command::M | Command::Esc) => s.return_to_menu(),
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily::DailyKey;
    use crate::progress::Progress;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn app() -> App<ChaCha12Rng> {
        App::new(GameSession::new_with_rng(
            Progress::new(MemoryStore::default()),
            DailyKey::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            true,
            ChaCha12Rng::seed_from_u64(0x0123_4567_89AB_CDEF),
        ))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn menu_navigation() {
        let mut app = app();
        let now = Instant::now();
        app.handle_event(&key(KeyCode::Down), now);
        assert_eq!(app.session.mode(), Mode::Classic);
        app.handle_event(&key(KeyCode::Down), now);
        assert_eq!(app.session.mode(), Mode::Tutorial);
        app.handle_event(&key(KeyCode::Up), now);
        app.handle_event(&key(KeyCode::Up), now);
        app.handle_event(&key(KeyCode::Up), now);
        assert_eq!(app.session.mode(), Mode::Tutorial);
        app.handle_event(&key(KeyCode::Enter), now);
        assert_eq!(app.session.phase(), Phase::Countdown(3));
        assert_eq!(app.session.mode(), Mode::Tutorial);
    }

    #[test]
    fn hotkeys_begin() {
        let mut app = app();
        app.handle_event(&key(KeyCode::Char('c')), Instant::now());
        assert_eq!(app.session.mode(), Mode::Classic);
        assert_eq!(app.session.phase(), Phase::Countdown(3));
        app.handle_event(&key(KeyCode::Char('m')), Instant::now());
        assert_eq!(app.session.phase(), Phase::Start);
        assert_eq!(app.session.next_deadline(), None);
    }

    #[test]
    fn steering_with_d() {
        let mut app = app();
        let t0 = Instant::now();
        app.handle_event(&key(KeyCode::Char('d')), t0);
        assert_eq!(app.session.mode(), Mode::Daily);
        let playing = t0 + consts::COUNTDOWN_STEP * 3;
        app.session.update(playing);
        assert_eq!(app.session.phase(), Phase::Playing);
        app.handle_event(&key(KeyCode::Char('d')), playing);
        let tick = app.session.next_deadline().unwrap();
        app.session.update(tick);
        assert_eq!(app.session.snake().direction(), Direction::East);
    }

    #[test]
    fn quit() {
        let mut by_q = app();
        by_q.handle_event(&key(KeyCode::Char('q')), Instant::now());
        assert!(by_q.quitting);
        let mut by_ctrl_c = app();
        by_ctrl_c.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Instant::now(),
        );
        assert!(by_ctrl_c.quitting);
    }

    #[test]
    fn ignores_other_events() {
        let mut app = app();
        app.handle_event(&Event::FocusLost, Instant::now());
        app.handle_event(&key(KeyCode::Char('x')), Instant::now());
        assert_eq!(app.session.phase(), Phase::Start);
        assert!(!app.quitting);
    }
}
