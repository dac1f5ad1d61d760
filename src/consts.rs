//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Number of seconds shown on the countdown before a game starts
pub(crate) const COUNTDOWN_SECONDS: u8 = 5;

/// Period of the countdown timer
pub(crate) const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Longest time the game screen will block waiting for input before checking
/// its timers & advancing music fades
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Length of the snake at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: u8 = 3;

/// Fewest food items the pantry aims to keep on the board
pub(crate) const MIN_FOODS: usize = 1;

/// Most food items that can be on the board at one time
pub(crate) const MAX_FOODS: usize = 3;

/// Seconds a food item stays on the board before rotting away
pub(crate) const FOOD_LIFETIME: f64 = 12.0;

/// Food flickers during the last this-many seconds of its lifetime
pub(crate) const FLICKER_WINDOW: f64 = 3.0;

/// Visibility toggles per second while food is flickering
pub(crate) const FLICKER_FREQUENCY: f64 = 3.0;

/// Amount by which eating a food item shifts each color accumulator
pub(crate) const COLOR_STEP: f64 = 0.05;

/// Tolerance for comparisons of accumulated seconds
pub(crate) const EPSILON: f64 = 1e-9;

/// Fade-in length for the menu & in-game music
pub(crate) const MUSIC_FADE_IN: Duration = Duration::from_secs(5);

/// Fade-out length for music when leaving a screen
pub(crate) const MUSIC_FADE_OUT: Duration = Duration::from_secs(5);

/// Fade-out length for music when the snake dies
pub(crate) const GAME_OVER_FADE_OUT: Duration = Duration::from_millis(500);

/// Glyphs (two columns wide) for the snake's head, by heading
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: &str = "▲▲";
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: &str = "▼▼";
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: &str = "▐▶";
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: &str = "◀▌";

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "██";

/// Glyph for food
pub(crate) const FOOD_SYMBOL: &str = "◆ ";

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Style for the snake in the menu logo
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Styles for food, by channel
pub(crate) const RED_STYLE: Style = Style::new().fg(Color::LightRed);
pub(crate) const GREEN_STYLE: Style = Style::new().fg(Color::LightGreen);
pub(crate) const BLUE_STYLE: Style = Style::new().fg(Color::LightBlue);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for the big countdown number
pub(crate) const COUNTDOWN_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);
