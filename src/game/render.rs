//! Drawing a [`GameSession`] with ratatui
use super::{GameSession, Mode, Phase};
use crate::consts::{self, CELL_WIDTH, GRID_SIZE};
use crate::daily::{format_countdown, time_until_next};
use crate::util::{center_rect, get_display_area};
use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
};
use std::time::{Duration, Instant};

/// A snapshot of a session at a given moment, ready to be drawn
#[derive(Debug)]
pub(crate) struct SessionView<'a, R> {
    session: &'a GameSession<R>,
    now: Instant,
    clock: DateTime<Utc>,
}

impl<'a, R> SessionView<'a, R> {
    /// `now` is used for the play time; `clock` for the time until the next
    /// daily puzzle
    pub(crate) fn new(session: &'a GameSession<R>, now: Instant, clock: DateTime<Utc>) -> Self {
        SessionView {
            session,
            now,
            clock,
        }
    }

    fn render_menu(&self, area: Rect, buf: &mut Buffer) {
        let s = self.session;
        let [title_area, daily_area, status_area, modes_area, help_area] =
            Layout::vertical([1u16, 1, 1, 5, 1])
                .flex(Flex::Center)
                .spacing(1)
                .areas(area);
        Line::styled("D A I L Y   S N A K E", consts::SNAKE_STYLE)
            .centered()
            .render(title_area, buf);
        Line::from(format!("Puzzle #{} · {}", s.today().number(), s.today()))
            .centered()
            .render(daily_area, buf);
        let status = match s.daily_record() {
            Some(r) if r.completed => format!(
                "Solved in {} with {} lives lost",
                format_elapsed(Duration::from_secs(r.elapsed_time)),
                r.lives
            ),
            Some(r) => format!("In progress: {}/{} fruits", r.score, r.target_fruits),
            None => String::from("Not yet played"),
        };
        Line::from(status).centered().render(status_area, buf);

        let rows = Layout::vertical([1u16; 3]).spacing(1).split(modes_area);
        for (mode, &row) in Mode::iter().zip(rows.iter()) {
            let style = if mode == s.mode() {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let note = match mode {
                Mode::Daily => String::new(),
                Mode::Classic => format!(" (best: {})", s.classic_high_score()),
                Mode::Tutorial if !s.has_played_tutorial() => String::from(" (new!)"),
                Mode::Tutorial => String::new(),
            };
            let [row] = Layout::horizontal([30u16]).flex(Flex::Center).areas(row);
            Line::from_iter([
                Span::styled(" (", style),
                Span::styled(mode.hotkey().to_string(), consts::KEY_STYLE.patch(style)),
                Span::styled(format!(") {mode}{note}"), style),
            ])
            .style(style)
            .render(row, buf);
        }
        hint_line(&[("↑↓", "choose"), ("Enter", "play"), ("q", "quit")])
            .centered()
            .render(help_area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let s = self.session;
        let mut parts = vec![match s.mode() {
            Mode::Daily if s.practice() => format!("Daily #{} (practice)", s.today().number()),
            Mode::Daily => format!("Daily #{}", s.today().number()),
            mode => mode.to_string(),
        }];
        match s.target() {
            Some(target) => parts.push(format!("Fruits {}/{target}", s.score())),
            None => {
                parts.push(format!("Score {}", s.score().saturating_add(s.bonus())));
                parts.push(format!("Best {}", s.classic_high_score()));
            }
        }
        match s.kiwi_quota() {
            Some(0) => (),
            Some(quota) => parts.push(format!("Kiwis {}/{quota}", s.kiwi_count())),
            None => parts.push(format!("Kiwis {}", s.kiwi_count())),
        }
        if s.bonus() > 0 {
            parts.push(format!("Bonus +{}", s.bonus()));
        }
        parts.push(format!("Lives lost {}", s.lives()));
        parts.push(format_elapsed(s.elapsed(self.now)));
        Line::styled(format!(" {}", parts.join("  ")), consts::STATUS_BAR_STYLE)
            .render(area, buf);
    }

    /// Draw the playing field and return the area inside its border
    fn render_board(&self, area: Rect, buf: &mut Buffer) -> Rect {
        let s = self.session;
        let block_area = center_rect(
            area,
            Size {
                width: GRID_SIZE * CELL_WIDTH + 2,
                height: GRID_SIZE + 2,
            },
        );
        DottedBorder.render(block_area, buf);
        let board_area = block_area.inner(Margin::new(1, 1));
        let mut canvas = Canvas {
            area: board_area,
            buf,
        };
        for pos in s.walls().iter() {
            canvas.draw_cell(pos, consts::WALL_SYMBOL, consts::WALL_STYLE);
        }
        if let Some(pos) = s.fruit() {
            canvas.draw_cell(pos, consts::FRUIT_SYMBOL, consts::FRUIT_STYLE);
        }
        if let Some(pos) = s.kiwi() {
            canvas.draw_cell(pos, consts::KIWI_SYMBOL, consts::KIWI_STYLE);
        }
        for &pos in s.snake().body().iter().skip(1) {
            canvas.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if s.phase() == Phase::Death {
            canvas.draw_cell(
                s.snake().head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            canvas.draw_cell(s.snake().head(), consts::SNAKE_HEAD_SYMBOL, consts::SNAKE_STYLE);
        }
        board_area
    }

    fn death_banner(&self) -> Banner {
        let s = self.session;
        let mut lines = Vec::new();
        if s.mode() == Mode::Classic {
            lines.push(Line::from(format!(
                "Score: {}  Length: {}",
                s.score().saturating_add(s.bonus()),
                s.snake().len()
            )));
            if s.new_high_score() {
                lines.push(Line::styled("New high score!", consts::VICTORY_STYLE));
            } else {
                lines.push(Line::from(format!("Best: {}", s.classic_high_score())));
            }
        } else {
            lines.push(Line::from(format!(
                "Fruits: {}/{}",
                s.score(),
                s.target().unwrap_or_default()
            )));
            lines.push(Line::from(format!("Lives lost: {}", s.lives())));
        }
        lines.push(Line::default());
        lines.push(hint_line(&[("Enter", "try again"), ("m", "menu")]));
        Banner {
            title: "WASTED",
            style: consts::DEATH_STYLE,
            lines,
        }
    }

    fn victory_banner(&self) -> Banner {
        let s = self.session;
        let mut lines = Vec::new();
        match s.mode() {
            Mode::Daily if s.practice() => {
                lines.push(Line::from("Practice run complete"));
            }
            Mode::Daily => {
                lines.push(Line::from(format!("Puzzle #{} solved!", s.today().number())));
            }
            _ => lines.push(Line::from("You've got the hang of it!")),
        }
        lines.push(Line::from(match s.kiwi_quota().filter(|&q| q > 0) {
            Some(quota) => format!("Fruits: {}  Kiwis: {}/{quota}", s.score(), s.kiwi_count()),
            None => format!("Fruits: {}", s.score()),
        }));
        lines.push(Line::from(format!(
            "Lives lost: {}  Time: {}",
            s.lives(),
            format_elapsed(s.elapsed(self.now))
        )));
        if s.mode() == Mode::Daily {
            lines.push(Line::from(format!(
                "Next puzzle in {}",
                format_countdown(time_until_next(self.clock))
            )));
        }
        lines.push(Line::default());
        lines.push(hint_line(&[("r", "replay"), ("c", "classic"), ("m", "menu")]));
        Banner {
            title: "VICTORY!",
            style: consts::VICTORY_STYLE,
            lines,
        }
    }
}

impl<R> Widget for SessionView<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        if self.session.phase() == Phase::Start {
            self.render_menu(display, buf);
            return;
        }
        let [status_area, board_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(display);
        self.render_status(status_area, buf);
        let board_area = self.render_board(board_area, buf);
        match self.session.phase() {
            Phase::Start => (),
            Phase::Countdown(n) => {
                // Keep clear of the snake, which starts in the middle
                let upper = Rect {
                    height: board_area.height / 2,
                    ..board_area
                };
                Banner {
                    title: "",
                    style: Style::new(),
                    lines: vec![Line::styled(n.to_string(), consts::KIWI_STYLE)],
                }
                .render(upper, buf);
            }
            Phase::Playing => (),
            Phase::Death => self.death_banner().render(board_area, buf),
            Phase::Victory => self.victory_banner().render(board_area, buf),
        }
        hint_line(&[("←↑↓→", "steer"), ("m", "menu"), ("q", "quit")]).render(help_area, buf);
    }
}

/// A bordered box of centered text drawn in the middle of an area
#[derive(Clone, Debug, Eq, PartialEq)]
struct Banner {
    title: &'static str,
    style: Style,
    lines: Vec<Line<'static>>,
}

impl Widget for Banner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self
            .lines
            .iter()
            .map(Line::width)
            .chain(std::iter::once(self.title.len()))
            .max()
            .unwrap_or_default();
        let size = Size {
            width: u16::try_from(width).unwrap_or(u16::MAX).saturating_add(4),
            height: u16::try_from(self.lines.len())
                .unwrap_or(u16::MAX)
                .saturating_add(2),
        };
        let banner_area = center_rect(area, size);
        Clear.render(banner_area, buf);
        let mut block = Block::bordered();
        if !self.title.is_empty() {
            block = block.title(Line::styled(format!(" {} ", self.title), self.style).centered());
        }
        let inner = block.inner(banner_area);
        block.render(banner_area, buf);
        for (line, y) in self.lines.into_iter().zip(inner.y..inner.bottom()) {
            line.centered()
                .render(Rect::new(inner.x, y, inner.width, 1), buf);
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_char(&mut self, pos: Position, symbol: char) {
        let Some(x) = self.area.x.checked_add(pos.x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
        }
    }

    /// Draw a two-column glyph for a cell of the playing field
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let Some(x) = pos
            .x
            .checked_mul(CELL_WIDTH)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if self.area.contains(Position::new(x, y)) {
            self.buf
                .set_stringn(x, y, symbol, usize::from(CELL_WIDTH), Style::reset().patch(style));
        }
    }
}

/// The border around the playing field, dotted to show that the edges wrap
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let size = area.as_size();
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Position::ORIGIN, '·');
        canvas.draw_char(Position::new(max_x, 0), '·');
        canvas.draw_char(Position::new(max_x, max_y), '·');
        canvas.draw_char(Position::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}

/// Build a line of key hints, e.g., "m menu · q quit"
fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, &(key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" · "));
        }
        spans.push(Span::styled(key, consts::KEY_STYLE));
        spans.push(Span::raw(format!(" {action}")));
    }
    Line::from(spans)
}

/// Format play time as minutes & seconds
fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
