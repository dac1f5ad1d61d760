pub(crate) mod color;
mod direction;
mod food;
mod grid;
mod paused;
pub(crate) mod sim;
mod snake;
mod timer;
use self::color::Channel;
use self::direction::Direction;
use self::grid::{Board, Cell};
use self::paused::{PauseOpt, Paused};
use self::sim::{Collision, Notification, Phase, Simulation, Snapshot};
use self::timer::Alarm;
use crate::app::Screen;
use crate::audio::{self, Soundtrack};
use crate::command::Command;
use crate::consts;
use crate::difficulty::Difficulty;
use crate::highscores::ScoreStore;
use crate::menu::MainMenu;
use crate::util::{center_rect, get_display_area, EnumExt, Globals};
use crossterm::event::{poll, read, Event};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
    Frame,
};
use std::time::{Duration, Instant};

/// The game screen: drives a [`Simulation`] from the clock & keyboard and
/// draws it
#[derive(Clone, Debug)]
pub(crate) struct Game<R = StdRng> {
    sim: Simulation<R>,
    globals: Globals,

    /// Pause menu state; only meaningful while the game is paused
    menu: Paused,

    /// Whether the game that just ended set a new record
    new_record: bool,
    tick_alarm: Alarm,
    countdown_alarm: Alarm,

    /// When the music was last brought up to date
    last_update: Instant,
}

impl Game<StdRng> {
    pub(crate) fn new(globals: Globals, difficulty: Difficulty) -> Self {
        match globals.seed {
            Some(seed) => Game::new_with_rng(globals, difficulty, StdRng::seed_from_u64(seed)),
            None => {
                let best = globals.high_scores.get_best(difficulty);
                Game::from_simulation(globals, Simulation::new(difficulty, best))
            }
        }
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, difficulty: Difficulty, rng: R) -> Game<R> {
        let best = globals.high_scores.get_best(difficulty);
        Game::from_simulation(
            globals,
            Simulation::new_with_rng(difficulty, best, rng),
        )
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        let now = Instant::now();
        self.sync_alarms(now);
        if poll(self.wait_time(now))? {
            if let Some(screen) = self.handle_event(read()?) {
                return Ok(Some(screen));
            }
        }
        self.advance_clock(Instant::now());
        Ok(None)
    }

    /// Fire whichever timers are due and bring the music up to date
    fn advance_clock(&mut self, now: Instant) {
        self.sync_alarms(now);
        if self.countdown_alarm.fire(now) {
            self.sim.countdown_step();
            self.sync_alarms(now);
        }
        if self.tick_alarm.fire(now) {
            self.sim.tick();
        }
        self.dispatch();
        self.globals
            .jukebox
            .update(now.saturating_duration_since(self.last_update));
        self.last_update = now;
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        let screen = self.respond(&event);
        self.dispatch();
        screen
    }

    fn respond(&mut self, event: &Event) -> Option<Screen> {
        match self.sim.phase() {
            Phase::Paused => match self.menu.handle_event(event)? {
                PauseOpt::Resume => self.sim.toggle_pause(),
                PauseOpt::Restart => self.sim.restart(),
                PauseOpt::MainMenu => return Some(self.main_menu()),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            Phase::GameOver(_) => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::R => self.sim.restart(),
                Command::M => return Some(self.main_menu()),
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            },
            Phase::Countdown(_) | Phase::Running => {
                if *event == Event::FocusLost {
                    self.sim.toggle_pause();
                    return None;
                }
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::Up => self.sim.request_direction(Direction::North),
                    Command::Down => self.sim.request_direction(Direction::South),
                    Command::Left => self.sim.request_direction(Direction::West),
                    Command::Right => self.sim.request_direction(Direction::East),
                    Command::Esc | Command::P | Command::Space => self.sim.toggle_pause(),
                    Command::R => self.sim.restart(),
                    Command::M => return Some(self.main_menu()),
                    Command::Quit | Command::Q => return Some(Screen::Quit),
                    _ => (),
                }
            }
        }
        None
    }
}

impl<R> Game<R> {
    fn from_simulation(globals: Globals, sim: Simulation<R>) -> Game<R> {
        let mut game = Game {
            sim,
            globals,
            menu: Paused::new(),
            new_record: false,
            tick_alarm: Alarm::default(),
            countdown_alarm: Alarm::default(),
            last_update: Instant::now(),
        };
        game.dispatch();
        game
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    fn sync_alarms(&mut self, now: Instant) {
        self.tick_alarm.sync(self.sim.tick_timer(), now);
        self.countdown_alarm.sync(self.sim.countdown_timer(), now);
    }

    /// How long to wait for input before the next timer is due
    fn wait_time(&self, now: Instant) -> Duration {
        [self.tick_alarm.deadline(), self.countdown_alarm.deadline()]
            .into_iter()
            .flatten()
            .min()
            .map_or(consts::POLL_INTERVAL, |when| {
                when.saturating_duration_since(now)
            })
            .min(consts::POLL_INTERVAL)
    }

    /// Pass the simulation's notifications on to the music & the high score
    /// records
    fn dispatch(&mut self) {
        let difficulty = self.sim.difficulty();
        for note in self.sim.take_notifications() {
            match note {
                Notification::PhaseChanged(phase) => {
                    audio::phase_cue(&mut self.globals.jukebox, difficulty, phase);
                    match phase {
                        Phase::Paused => self.menu = Paused::new(),
                        Phase::Countdown(_) => self.new_record = false,
                        _ => (),
                    }
                }
                Notification::ScoreChanged(score) => tracing::trace!(score, "score changed"),
                Notification::NewBest { difficulty, score } => {
                    tracing::info!(%difficulty, score, "new high score");
                    self.new_record = true;
                    self.globals.high_scores.set_best(difficulty, score);
                    self.globals.save_high_scores();
                }
            }
        }
    }

    fn main_menu(&mut self) -> Screen {
        self.globals.jukebox.stop(Some(consts::MUSIC_FADE_OUT));
        Screen::Main(Box::new(MainMenu::new(
            self.globals.clone(),
            self.sim.difficulty(),
        )))
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.sim.snapshot();
        let display = get_display_area(area);
        let [score_area, main_area, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(" Score: {}    Best: {}", snap.score, snap.best_score),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let board_size = board_block_size(snap.board);
        let [board_area, panel_area] =
            Layout::horizontal([Constraint::Length(board_size.width), Constraint::Fill(1)])
                .spacing(1)
                .areas(main_area);
        let board_area = Rect {
            height: board_area.height.min(board_size.height),
            ..board_area
        };
        Block::bordered().render(board_area, buf);
        let mut canvas = Canvas {
            area: board_area.inner(Margin::new(1, 1)),
            board: snap.board,
            buf,
        };
        for food in snap.food.iter().filter(|f| f.visible) {
            canvas.draw_cell(food.position, consts::FOOD_SYMBOL, food.channel.style());
        }
        let snake_style = Style::new().fg(snap.color.to_terminal());
        for &cell in snap.snake.iter().skip(1) {
            canvas.draw_cell(cell, consts::SNAKE_BODY_SYMBOL, snake_style);
        }
        if let Some(&head) = snap.snake.first() {
            if matches!(snap.phase, Phase::GameOver(_)) {
                canvas.draw_cell(head, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
            } else {
                canvas.draw_cell(head, head_symbol(snap.heading), snake_style);
            }
        }

        SidePanel(&snap).render(panel_area, buf);

        match snap.phase {
            Phase::Countdown(n) => {
                let inner = board_area.inner(Margin::new(1, 1));
                let [upper, _] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)]).areas(inner);
                let text = format!("Starting in {n}");
                let width = u16::try_from(text.len())
                    .unwrap_or(u16::MAX)
                    .saturating_add(4);
                let popup = center_rect(upper, Size { width, height: 3 });
                let block = Block::bordered().padding(Padding::horizontal(1));
                let inner = block.inner(popup);
                Clear.render(popup, buf);
                block.render(popup, buf);
                Line::styled(text, consts::COUNTDOWN_STYLE).render(inner, buf);
                hint_line(&[("Pause", "p"), ("Restart", "r"), ("Menu", "m"), ("Quit", "q")])
                    .render(hint_area, buf);
            }
            Phase::Running => {
                hint_line(&[("Pause", "p"), ("Restart", "r"), ("Menu", "m"), ("Quit", "q")])
                    .render(hint_area, buf);
            }
            Phase::Paused => {
                let pause_area = center_rect(
                    board_area,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                self.menu.render(pause_area, buf);
            }
            Phase::GameOver(collision) => {
                GameOverPanel {
                    snap: &snap,
                    collision,
                    new_record: self.new_record,
                }
                .render(board_area, buf);
                hint_line(&[("Restart", "r"), ("Main Menu", "m"), ("Quit", "q")])
                    .render(hint_area, buf);
            }
        }
    }
}

/// Size of the bordered board, with each cell two columns wide
fn board_block_size(board: Board) -> Size {
    let cols = u16::try_from(board.cols).unwrap_or(0);
    let rows = u16::try_from(board.rows).unwrap_or(0);
    Size {
        width: cols.saturating_mul(2).saturating_add(2),
        height: rows.saturating_add(2),
    }
}

fn head_symbol(heading: Direction) -> &'static str {
    match heading {
        Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
        Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
        Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
        Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
    }
}

fn hint_line(items: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut line = Line::default();
    for &(label, key) in items {
        line.push_span(Span::raw(format!(" {label} (")));
        line.push_span(Span::styled(key, consts::KEY_STYLE));
        line.push_span(Span::raw(") "));
    }
    line
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    board: Board,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw a two-column `symbol` at board cell `cell`
    fn draw_cell(&mut self, cell: Cell, symbol: &str, style: Style) {
        let Some(x) = u16::try_from(cell.x)
            .ok()
            .and_then(|x| x.checked_mul(2))
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self
            .board
            .screen_row(cell.y)
            .and_then(|y| self.area.y.checked_add(y))
        else {
            return;
        };
        if y >= self.area.bottom() {
            return;
        }
        for (ch, x) in symbol.chars().zip(x..self.area.right()) {
            if let Some(c) = self.buf.cell_mut((x, y)) {
                c.set_char(ch);
                c.set_style(Style::reset().patch(style));
            }
        }
    }
}

/// Statistics shown beside the board
#[derive(Clone, Copy, Debug, PartialEq)]
struct SidePanel<'a>(&'a Snapshot);

impl Widget for SidePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.0;
        let block = Block::bordered()
            .title(format!(" {} ", snap.difficulty.title()))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);
        let mut lines = vec![
            Line::from(format!("Speed: {:.3} s/step", snap.tick_seconds)),
            Line::default(),
            Line::from("Herbs eaten:"),
        ];
        for channel in Channel::iter() {
            lines.push(Line::from_iter([
                Span::raw("  "),
                Span::styled(consts::FOOD_SYMBOL, channel.style()),
                Span::raw(format!("{:<6}{:>4}", channel.name(), snap.eaten[channel])),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from_iter([
            Span::raw("Hue: "),
            Span::styled(
                consts::SNAKE_BODY_SYMBOL,
                Style::new().fg(snap.color.to_terminal()),
            ),
        ]));
        lines.push(Line::default());
        lines.extend(snap.difficulty.description().map(Line::from));
        Text::from(lines).render(inner, buf);
    }
}

/// The pop-up shown when the snake dies
#[derive(Clone, Copy, Debug, PartialEq)]
struct GameOverPanel<'a> {
    snap: &'a Snapshot,
    collision: Collision,
    new_record: bool,
}

impl GameOverPanel<'_> {
    const WIDTH: u16 = 38;
    const HEIGHT: u16 = 8;
}

impl Widget for GameOverPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = center_rect(
            area,
            Size {
                width: GameOverPanel::WIDTH,
                height: GameOverPanel::HEIGHT,
            },
        );
        let block = Block::bordered()
            .title(" GAME OVER ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        let cause = match self.collision {
            Collision::Wall => "The snake ran into a wall!",
            Collision::SelfBite => "The snake bit its own tail!",
        };
        let record = if self.new_record {
            Line::styled("New record!", consts::COUNTDOWN_STYLE)
        } else {
            Line::from(format!("Best: {}", self.snap.best_score))
        };
        Text::from_iter([
            Line::from(cause),
            Line::default(),
            Line::from(self.snap.end_message),
            Line::default(),
            Line::from(format!("Score: {}", self.snap.score)),
            record,
        ])
        .centered()
        .render(inner, buf);
    }
}
