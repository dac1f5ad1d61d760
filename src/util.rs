use crate::audio::Jukebox;
use crate::config::Config;
use crate::consts;
use crate::highscores::HighScores;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};

/// State shared by every screen of the application
#[derive(Clone, Debug, Default)]
pub(crate) struct Globals {
    pub(crate) config: Config,
    pub(crate) high_scores: HighScores,
    pub(crate) jukebox: Jukebox,

    /// Seed for the game's random number generator, if a reproducible game
    /// was requested
    pub(crate) seed: Option<u64>,
}

impl Globals {
    /// Write the high scores to disk, logging any failure
    pub(crate) fn save_high_scores(&self) {
        match self.config.save_high_scores(&self.high_scores) {
            Ok(()) => tracing::info!("saved high scores"),
            Err(e) => tracing::error!(error = ?e, "failed to save high scores"),
        }
    }
}

/// Return the area in which the application should draw, centered within
/// the terminal
pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of the given size centered within `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

/// Iteration & stepping over the variants of a fieldless enum
pub(crate) trait EnumExt: Enum + Sized {
    fn iter() -> impl Iterator<Item = Self>;
    fn min() -> Self;
    fn max() -> Self;
    fn next(self) -> Option<Self>;
    fn prev(self) -> Option<Self>;
}

impl<T: Enum> EnumExt for T {
    fn iter() -> impl Iterator<Item = T> {
        (0..T::LENGTH).map(T::from_usize)
    }

    fn min() -> T {
        T::from_usize(0)
    }

    fn max() -> T {
        T::from_usize(T::LENGTH.saturating_sub(1))
    }

    fn next(self) -> Option<T> {
        let i = self.into_usize().checked_add(1)?;
        (i < T::LENGTH).then(|| T::from_usize(i))
    }

    fn prev(self) -> Option<T> {
        self.into_usize().checked_sub(1).map(T::from_usize)
    }
}
