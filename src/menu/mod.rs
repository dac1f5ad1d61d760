mod widgets;
use self::widgets::{Instructions, Logo};
use crate::app::Screen;
use crate::audio::{Playback, Soundtrack, Track};
use crate::command::Command;
use crate::consts;
use crate::difficulty::Difficulty;
use crate::game::Game;
use crate::highscores::ScoreStore;
use crate::util::{get_display_area, EnumExt, Globals};
use crossterm::event::{poll, read, Event};
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};
use std::time::Instant;

#[derive(Clone, Debug)]
pub(crate) struct MainMenu {
    globals: Globals,
    selection: Selection,
    difficulty: Difficulty,

    /// When the music was last brought up to date
    last_update: Instant,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals, difficulty: Difficulty) -> Self {
        let mut menu = MainMenu {
            globals,
            selection: Selection::default(),
            difficulty,
            last_update: Instant::now(),
        };
        menu.cue_music();
        menu
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if poll(consts::POLL_INTERVAL)? {
            if let Some(screen) = self.handle_event(read()?) {
                return Ok(Some(screen));
            }
        }
        let now = Instant::now();
        self.globals
            .jukebox
            .update(now.saturating_duration_since(self.last_update));
        self.last_update = now;
        self.cue_music();
        Ok(None)
    }

    /// Start the menu theme once any game music has finished fading out
    fn cue_music(&mut self) {
        if self.globals.jukebox.playback() == Playback::Stopped {
            self.globals
                .jukebox
                .play(Track::Menu, Some(consts::MUSIC_FADE_IN));
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match (
            self.selection,
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit | Command::Q) | (Selection::QuitButton, Command::Enter) => {
                return Some(Screen::Quit)
            }
            (_, Command::P) | (Selection::PlayButton, Command::Enter) => {
                return Some(Screen::Game(Box::new(self.play())))
            }
            (_, Command::X) | (Selection::ResetButton, Command::Enter) => self.reset_records(),
            (_, Command::Home) => self.selection = Selection::min(),
            (_, Command::End) => self.selection = Selection::max(),
            (_, Command::Up) => {
                if let Some(sel) = self.selection.prev() {
                    self.selection = sel;
                }
            }
            (_, Command::Down) => {
                if let Some(sel) = self.selection.next() {
                    self.selection = sel;
                }
            }
            (_, Command::Next) => {
                self.selection = self.selection.next().unwrap_or_else(Selection::min);
            }
            (_, Command::Prev) => {
                self.selection = self.selection.prev().unwrap_or_else(Selection::max);
            }
            (Selection::Difficulty, Command::Left) => {
                if let Some(d) = self.difficulty.prev() {
                    self.difficulty = d;
                }
            }
            (Selection::Difficulty, Command::Right) => {
                if let Some(d) = self.difficulty.next() {
                    self.difficulty = d;
                }
            }
            (Selection::Difficulty, Command::Enter | Command::Space) => {
                self.difficulty = self.difficulty.next().unwrap_or_else(<Difficulty as EnumExt>::min);
            }
            _ => (),
        }
        None
    }

    fn play(&self) -> Game {
        tracing::debug!(difficulty = %self.difficulty, "starting game");
        Game::new(self.globals.clone(), self.difficulty)
    }

    fn reset_records(&mut self) {
        tracing::info!("clearing high scores");
        self.globals.high_scores.clear();
        self.globals.save_high_scores();
    }
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [logo_area, instructions_area, play_area, difficulty_area, reset_area, quit_area] =
            Layout::vertical([
                Logo::HEIGHT,
                Instructions::HEIGHT,
                1,
                DifficultyBox::HEIGHT,
                1,
                1,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo.render(logo_area, buf);

        let [instructions_area] = Layout::horizontal([Instructions::WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        Instructions.render(instructions_area, buf);

        button("Play", "p", self.selection == Selection::PlayButton).render(play_area, buf);

        let [difficulty_area] = Layout::horizontal([DifficultyBox::WIDTH])
            .flex(Flex::Center)
            .areas(difficulty_area);
        DifficultyBox {
            difficulty: self.difficulty,
            best: self.globals.high_scores.get_best(self.difficulty),
            selected: self.selection == Selection::Difficulty,
        }
        .render(difficulty_area, buf);

        button(
            "Reset Records",
            "x",
            self.selection == Selection::ResetButton,
        )
        .render(reset_area, buf);
        button("Quit", "q", self.selection == Selection::QuitButton).render(quit_area, buf);
    }
}

fn button(label: &'static str, key: &'static str, selected: bool) -> Line<'static> {
    let style = if selected {
        consts::MENU_SELECTION_STYLE
    } else {
        Style::new()
    };
    Line::from_iter([
        Span::styled(format!("[{label} ("), style),
        Span::styled(key, consts::KEY_STYLE.patch(style)),
        Span::styled(")]", style),
    ])
    .centered()
}

#[derive(Clone, Copy, Debug, Default, Enum, Eq, PartialEq)]
enum Selection {
    #[default]
    PlayButton,
    Difficulty,
    ResetButton,
    QuitButton,
}

/// The difficulty selector along with the chosen mode's blurb & record
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DifficultyBox {
    difficulty: Difficulty,
    best: u32,
    selected: bool,
}

impl DifficultyBox {
    const HEIGHT: u16 = 6;
    const WIDTH: u16 = 38;
}

impl Widget for DifficultyBox {
    /*
     * ┌ Difficulty: ───────────────────────┐
     * │ » ◁ Herb Gathering ▶               │
     * │     Gather herbs; the snake's hue  │
     * │     soaks up every one it eats.    │
     * │     Best score: 0                  │
     * └────────────────────────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Difficulty: ")
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);
        let left = if self.difficulty.prev().is_some() {
            "◀"
        } else {
            "◁"
        };
        let right = if self.difficulty.next().is_some() {
            "▶"
        } else {
            "▷"
        };
        let selector = Line::from(format!(
            "{pointer:2}{left} {title} {right}",
            pointer = if self.selected { "»" } else { "" },
            title = self.difficulty.title(),
        ));
        let selector = if self.selected {
            selector.style(consts::MENU_SELECTION_STYLE)
        } else {
            selector
        };
        let [line1, line2] = self.difficulty.description();
        Text::from_iter([
            selector,
            Line::from(format!("    {line1}")),
            Line::from(format!("    {line2}")),
            Line::from(format!("    Best score: {}", self.best)),
        ])
        .render(inner, buf);
    }
}
