//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::{Position, Size},
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Width and height of the (square) playing field, in cells
pub(crate) const GRID_SIZE: u16 = 20;

/// Starting time between movements of the snake, in milliseconds
pub(crate) const INITIAL_SPEED: u32 = 150;

/// Fastest time between movements of the snake, in milliseconds
pub(crate) const MIN_SPEED: u32 = 80;

/// How much faster (in milliseconds) the snake gets per fruit in modes without
/// a fruit target
pub(crate) const SPEED_DECREMENT: u32 = 2;

/// Fewest fruits a daily puzzle can require
pub(crate) const MIN_FRUITS: i32 = 10;

/// Most fruits a daily puzzle can require
pub(crate) const MAX_FRUITS: i32 = 20;

/// Fruit target & kiwi quota used when running with `--debug`
pub(crate) const DEBUG_TARGET: u32 = 3;
pub(crate) const DEBUG_KIWIS: u32 = 1;

/// The only obstacle on the board when running the daily puzzle with
/// `--debug`
pub(crate) const DEBUG_WALL: Position = Position { x: 5, y: 5 };

/// Fruit target & kiwi quota for the tutorial
pub(crate) const TUTORIAL_TARGET: u32 = 3;
pub(crate) const TUTORIAL_KIWIS: u32 = 1;

/// Chance that a given day's puzzle includes kiwis
pub(crate) const KIWI_DAY_PROBABILITY: f64 = 0.3;

/// Fewest & most kiwis on a kiwi day
pub(crate) const MIN_KIWIS: i32 = 1;
pub(crate) const MAX_KIWIS: i32 = 3;

/// In Classic mode, a kiwi appears every this many fruits
pub(crate) const CLASSIC_KIWI_CADENCE: usize = 15;

/// Points awarded for eating a kiwi
pub(crate) const KIWI_BONUS: u32 = 5;

/// How long an uneaten kiwi stays on the board
pub(crate) const KIWI_LIFETIME: Duration = Duration::from_millis(5000);

/// Length of the daily fruit sequence
pub(crate) const DAILY_SEQUENCE_LEN: usize = 500;

/// Length of the Classic fruit sequence
pub(crate) const CLASSIC_SEQUENCE_LEN: usize = 1000;

/// Length of the tutorial fruit sequence
pub(crate) const TUTORIAL_SEQUENCE_LEN: usize = 50;

/// How many sequence entries to examine when looking for a free fruit cell
pub(crate) const FRUIT_LOOKAHEAD: usize = 50;

/// How many uniformly random cells to try when the sequence (or, for kiwis,
/// anything) fails to provide a free cell
pub(crate) const RANDOM_PLACEMENT_ATTEMPTS: usize = 100;

/// How many layouts to try before falling back to an open board
pub(crate) const LEVEL_ATTEMPTS: u32 = 100;

/// Where the snake's head starts
pub(crate) const SPAWN: Position = Position { x: 10, y: 10 };

/// Length of a freshly-spawned snake
pub(crate) const INITIAL_SNAKE_LENGTH: u16 = 3;

/// Walls are never placed within this many cells of `SPAWN` horizontally ...
pub(crate) const SPAWN_CLEARANCE_X: u16 = 1;

/// ... and vertically
pub(crate) const SPAWN_CLEARANCE_Y: u16 = 2;

/// The countdown shown before play starts
pub(crate) const COUNTDOWN_FROM: u8 = 3;

/// Time between countdown steps
pub(crate) const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Maximum time between redraws, so that the clock keeps ticking on screen
pub(crate) const REDRAW_PERIOD: Duration = Duration::from_millis(100);

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Each cell of the playing field is drawn this many terminal columns wide
pub(crate) const CELL_WIDTH: u16 = 2;

/// Glyph for the snake's head
pub(crate) const SNAKE_HEAD_SYMBOL: &str = "██";

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "▓▓";

/// Glyph for the fruit
pub(crate) const FRUIT_SYMBOL: &str = "()";

/// Glyph for the kiwi
pub(crate) const KIWI_SYMBOL: &str = "<>";

/// Glyph for walls
pub(crate) const WALL_SYMBOL: &str = "▒▒";

/// Glyph for the snake's head when it's collided with something
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the fruit
pub(crate) const FRUIT_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for the kiwi
pub(crate) const KIWI_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Style for walls
pub(crate) const WALL_STYLE: Style = Style::new().fg(Color::Gray);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for the status bar at the top of the game screen
pub(crate) const STATUS_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the selected item in the mode menu
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the "WASTED" banner
pub(crate) const DEATH_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Style for the "VICTORY!" banner
pub(crate) const VICTORY_STYLE: Style = Style::new()
    .fg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);
