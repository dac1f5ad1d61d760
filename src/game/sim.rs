use super::color::{Channel, ColorBlend, Rgb};
use super::direction::Direction;
use super::food::Pantry;
use super::grid::{Board, Cell};
use super::snake::Snake;
use super::timer::Timer;
use crate::consts;
use crate::difficulty::Difficulty;
use enum_map::EnumMap;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Why the snake died
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    Wall,
    SelfBite,
}

/// The simulation's top-level state
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// Waiting for the game to start; the payload is the number of seconds
    /// left, 1 through 5
    Countdown(u8),
    Running,
    Paused,
    GameOver(Collision),
}

/// Events for the collaborators that react to the game (music, best-score
/// storage) rather than draw it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Notification {
    PhaseChanged(Phase),
    ScoreChanged(u32),

    /// The game just ended with a score above the previous best
    NewBest {
        difficulty: Difficulty,
        score: u32,
    },
}

/// The snake game itself, minus any notion of wall-clock time, input
/// devices, or drawing.
///
/// Time enters only through [`Simulation::countdown_step()`] and
/// [`Simulation::tick()`], which the driver calls whenever the corresponding
/// [`Timer`] fires.
#[derive(Clone, Debug)]
pub(crate) struct Simulation<R = StdRng> {
    rng: R,
    difficulty: Difficulty,
    board: Board,
    phase: Phase,
    tick_seconds: f64,
    score: u32,
    best_score: u32,
    pub(super) snake: Snake,
    pub(super) food: Pantry,
    color: ColorBlend,
    tick_timer: Timer,
    countdown_timer: Timer,
    notifications: Vec<Notification>,
}

impl Simulation<StdRng> {
    pub(crate) fn new(difficulty: Difficulty, best_score: u32) -> Self {
        Simulation::new_with_rng(difficulty, best_score, StdRng::from_os_rng())
    }
}

impl<R: Rng> Simulation<R> {
    pub(crate) fn new_with_rng(difficulty: Difficulty, best_score: u32, rng: R) -> Simulation<R> {
        let profile = difficulty.profile();
        let board = Board::new(profile.rows, profile.cols);
        let mut sim = Simulation {
            rng,
            difficulty,
            board,
            phase: Phase::Countdown(consts::COUNTDOWN_SECONDS),
            tick_seconds: profile.initial_tick,
            score: 0,
            best_score,
            snake: Snake::new(board),
            food: Pantry::default(),
            color: ColorBlend::new(profile.initial_color(), profile.polarity),
            tick_timer: Timer::default(),
            countdown_timer: Timer::default(),
            notifications: Vec::new(),
        };
        sim.reset();
        sim
    }

    /// Throw away the current session and start over from a fresh countdown.
    /// Safe to call in any phase.
    pub(crate) fn restart(&mut self) {
        tracing::debug!(difficulty = %self.difficulty, "restarting game");
        self.reset();
    }

    fn reset(&mut self) {
        let profile = self.difficulty.profile();
        self.tick_timer.stop();
        self.tick_seconds = profile.initial_tick;
        self.snake = Snake::new(self.board);
        self.food
            .spawn_initial(&mut self.rng, self.board, &self.snake);
        self.color = ColorBlend::new(profile.initial_color(), profile.polarity);
        if self.score != 0 {
            self.score = 0;
            self.notifications.push(Notification::ScoreChanged(0));
        }
        self.countdown_timer
            .start(consts::COUNTDOWN_PERIOD.as_secs_f64());
        self.set_phase(Phase::Countdown(consts::COUNTDOWN_SECONDS));
    }

    /// Ask the snake to turn on its next move.  Reversals are ignored, as is
    /// everything once the game is over.
    pub(crate) fn request_direction(&mut self, direction: Direction) {
        if !matches!(self.phase, Phase::GameOver(_)) {
            self.snake.request_direction(direction);
        }
    }

    /// Pause a running game or resume a paused one.  Does nothing in any
    /// other phase.
    pub(crate) fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => {
                self.tick_timer.stop();
                self.set_phase(Phase::Paused);
            }
            Phase::Paused => {
                self.tick_timer.start(self.tick_seconds);
                self.set_phase(Phase::Running);
            }
            _ => (),
        }
    }

    /// Called once per second during the countdown
    pub(crate) fn countdown_step(&mut self) {
        let Phase::Countdown(left) = self.phase else {
            return;
        };
        match left.saturating_sub(1) {
            0 => {
                self.countdown_timer.stop();
                self.tick_timer.start(self.tick_seconds);
                self.set_phase(Phase::Running);
            }
            n => self.set_phase(Phase::Countdown(n)),
        }
    }

    /// Move the game forwards by one tick.  Does nothing unless the game is
    /// running.
    pub(crate) fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.snake.apply_heading();
        self.food
            .advance(self.tick_seconds, &mut self.rng, self.board, &self.snake);
        let next = self.snake.next_head();
        if !self.board.contains(next) {
            self.game_over(Collision::Wall);
            return;
        }
        if self.snake.occupies(next) {
            self.game_over(Collision::SelfBite);
            return;
        }
        let eaten = self.food.take_at(next);
        self.snake.advance(eaten.is_some());
        if let Some(food) = eaten {
            self.score += 1;
            self.color.absorb(food.channel);
            tracing::debug!(
                channel = food.channel.name(),
                score = self.score,
                levels = ?self.color.levels(),
                "herb eaten"
            );
            self.notifications
                .push(Notification::ScoreChanged(self.score));
            self.food.refill(&mut self.rng, self.board, &self.snake);
            self.accelerate();
            self.tick_timer.start(self.tick_seconds);
        }
    }

    fn accelerate(&mut self) {
        let profile = self.difficulty.profile();
        if self.score == 0 || self.score % profile.accelerate_every != 0 {
            return;
        }
        let candidate = (self.tick_seconds - profile.acceleration_step).max(profile.minimum_tick);
        if candidate < self.tick_seconds - consts::EPSILON {
            tracing::debug!(
                score = self.score,
                from = self.tick_seconds,
                to = candidate,
                "speeding up"
            );
            self.tick_seconds = candidate;
        }
    }

    fn game_over(&mut self, collision: Collision) {
        self.tick_timer.stop();
        tracing::info!(
            difficulty = %self.difficulty,
            score = self.score,
            ?collision,
            "game over"
        );
        self.set_phase(Phase::GameOver(collision));
        if self.score > self.best_score {
            self.best_score = self.score;
            self.notifications.push(Notification::NewBest {
                difficulty: self.difficulty,
                score: self.score,
            });
        }
    }
}

impl<R> Simulation<R> {
    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(?phase, "phase changed");
        self.phase = phase;
        self.notifications.push(Notification::PhaseChanged(phase));
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub(crate) fn tick_timer(&self) -> &Timer {
        &self.tick_timer
    }

    pub(crate) fn countdown_timer(&self) -> &Timer {
        &self.countdown_timer
    }

    /// Return and clear the notifications raised since the last call
    pub(crate) fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            board: self.board,
            snake: self.snake.cells().iter().copied().collect(),
            heading: self.snake.heading(),
            food: self
                .food
                .items()
                .iter()
                .map(|f| FoodView {
                    position: f.position,
                    channel: f.channel,
                    visible: f.flash_visible,
                })
                .collect(),
            score: self.score,
            best_score: self.best_score,
            eaten: self.color.eaten(),
            color: self.color.display(),
            tick_seconds: self.tick_seconds,
            end_message: self.difficulty.profile().end_message,
        }
    }
}

/// A read-only picture of the game at one moment, for drawing
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) phase: Phase,
    pub(crate) difficulty: Difficulty,
    pub(crate) board: Board,

    /// Head first
    pub(crate) snake: Vec<Cell>,
    pub(crate) heading: Direction,
    pub(crate) food: Vec<FoodView>,
    pub(crate) score: u32,
    pub(crate) best_score: u32,
    pub(crate) eaten: EnumMap<Channel, u32>,

    /// The snake's color, clamped for display
    pub(crate) color: Rgb,
    pub(crate) tick_seconds: f64,
    pub(crate) end_message: &'static str,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FoodView {
    pub(crate) position: Cell,
    pub(crate) channel: Channel,
    pub(crate) visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::food::Food;
    use rand::seq::IndexedRandom;
    use rand_chacha::ChaCha12Rng;
    use std::collections::{HashSet, VecDeque};

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn new_sim(difficulty: Difficulty, best_score: u32) -> Simulation<ChaCha12Rng> {
        Simulation::new_with_rng(
            difficulty,
            best_score,
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        )
    }

    fn running_sim() -> Simulation<ChaCha12Rng> {
        let mut sim = new_sim(Difficulty::Normal, 0);
        for _ in 0..5 {
            sim.countdown_step();
        }
        assert_eq!(sim.phase(), Phase::Running);
        let _ = sim.take_notifications();
        sim
    }

    /// Put a single item of food right in front of the snake and tick
    fn feed(sim: &mut Simulation<ChaCha12Rng>, channel: Channel) {
        let ahead = sim.snake.next_head();
        sim.food.items = vec![Food::new(ahead, channel)];
        sim.tick();
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{actual} is not {expected}"
        );
    }

    #[test]
    fn new_game_starts_counting_down() {
        let mut sim = new_sim(Difficulty::Normal, 7);
        let snap = sim.snapshot();
        assert_eq!(snap.phase, Phase::Countdown(5));
        assert_eq!(
            snap.snake,
            [Cell::new(7, 10), Cell::new(6, 10), Cell::new(5, 10)]
        );
        assert_eq!(snap.heading, Direction::East);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.best_score, 7);
        assert!((1..=3).contains(&snap.food.len()));
        assert_close(snap.tick_seconds, 0.30);
        assert!(sim.countdown_timer().period().is_some());
        assert!(sim.tick_timer().period().is_none());
        assert_eq!(
            sim.take_notifications(),
            [Notification::PhaseChanged(Phase::Countdown(5))]
        );
    }

    #[test]
    fn countdown_reaches_running() {
        let mut sim = new_sim(Difficulty::Advanced, 0);
        let _ = sim.take_notifications();
        let before = sim.snapshot().snake;
        sim.tick();
        assert_eq!(sim.snapshot().snake, before, "ticked during countdown");
        for _ in 0..5 {
            sim.countdown_step();
        }
        assert_eq!(
            sim.take_notifications(),
            [
                Notification::PhaseChanged(Phase::Countdown(4)),
                Notification::PhaseChanged(Phase::Countdown(3)),
                Notification::PhaseChanged(Phase::Countdown(2)),
                Notification::PhaseChanged(Phase::Countdown(1)),
                Notification::PhaseChanged(Phase::Running),
            ]
        );
        assert!(sim.countdown_timer().period().is_none());
        assert_eq!(sim.tick_timer().period(), Some(0.25));
        // Extra steps are ignored.
        sim.countdown_step();
        assert_eq!(sim.phase(), Phase::Running);
    }

    #[test]
    fn pause_and_resume() {
        let mut sim = running_sim();
        sim.tick();
        let snap = sim.snapshot();
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Paused);
        assert!(sim.tick_timer().period().is_none());
        sim.tick();
        sim.tick();
        let paused = sim.snapshot();
        assert_eq!(paused.snake, snap.snake);
        assert_eq!(paused.food, snap.food);
        let generation = sim.tick_timer().generation();
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Running);
        assert!(sim.tick_timer().generation() > generation);
        assert_eq!(sim.tick_timer().period(), Some(snap.tick_seconds));
        assert_eq!(
            sim.take_notifications(),
            [
                Notification::PhaseChanged(Phase::Paused),
                Notification::PhaseChanged(Phase::Running),
            ]
        );
    }

    #[test]
    fn toggle_pause_ignored_during_countdown() {
        let mut sim = new_sim(Difficulty::Normal, 0);
        let _ = sim.take_notifications();
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Countdown(5));
        assert!(sim.take_notifications().is_empty());
    }

    #[test]
    fn restart_twice_is_fresh() {
        let mut sim = running_sim();
        feed(&mut sim, Channel::Red);
        feed(&mut sim, Channel::Green);
        sim.restart();
        let once = sim.snapshot();
        sim.restart();
        let twice = sim.snapshot();
        for snap in [&once, &twice] {
            assert_eq!(snap.phase, Phase::Countdown(5));
            assert_eq!(snap.score, 0);
            assert_eq!(snap.snake.len(), 3);
            assert_eq!(snap.eaten.values().sum::<u32>(), 0);
            assert_eq!(snap.color, normal_initial_color());
            assert_close(snap.tick_seconds, 0.30);
        }
        assert_eq!(once.snake, twice.snake);
        assert!(sim.tick_timer().period().is_none());
        assert!(sim.countdown_timer().period().is_some());
    }

    fn normal_initial_color() -> Rgb {
        ColorBlend::new(
            Difficulty::Normal.profile().initial_color(),
            Difficulty::Normal.profile().polarity,
        )
        .display()
    }

    #[test]
    fn reverse_request_is_discarded() {
        let mut sim = running_sim();
        sim.food.items.clear();
        sim.request_direction(Direction::West);
        sim.tick();
        let snap = sim.snapshot();
        assert_eq!(snap.heading, Direction::East);
        assert_eq!(snap.snake[0], Cell::new(8, 10));
    }

    #[test]
    fn direction_buffered_while_paused() {
        let mut sim = running_sim();
        sim.toggle_pause();
        sim.request_direction(Direction::North);
        sim.toggle_pause();
        sim.food.items.clear();
        sim.tick();
        assert_eq!(sim.snapshot().snake[0], Cell::new(7, 9));
    }

    #[test]
    fn wall_collision() {
        let mut sim = running_sim();
        sim.snake.cells = VecDeque::from([Cell::new(19, 5), Cell::new(18, 5), Cell::new(17, 5)]);
        sim.food.items.clear();
        sim.tick();
        assert_eq!(sim.phase(), Phase::GameOver(Collision::Wall));
        assert!(sim.tick_timer().period().is_none());
        // The snake is left where it was.
        assert_eq!(sim.snapshot().snake[0], Cell::new(19, 5));
    }

    #[test]
    fn top_slack_row_is_in_bounds() {
        let mut sim = running_sim();
        sim.snake.cells = VecDeque::from([Cell::new(4, 0), Cell::new(4, 1), Cell::new(4, 2)]);
        sim.snake.heading = Direction::North;
        sim.snake.pending = Direction::North;
        sim.food.items.clear();
        sim.tick();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.snapshot().snake[0], Cell::new(4, -1));
        sim.tick();
        assert_eq!(sim.phase(), Phase::GameOver(Collision::Wall));
    }

    #[test]
    fn bottom_row_is_short_one() {
        let mut sim = running_sim();
        sim.snake.cells = VecDeque::from([Cell::new(4, 18), Cell::new(4, 17), Cell::new(4, 16)]);
        sim.snake.heading = Direction::South;
        sim.snake.pending = Direction::South;
        sim.food.items.clear();
        sim.tick();
        assert_eq!(sim.phase(), Phase::GameOver(Collision::Wall));
    }

    #[test]
    fn self_collision() {
        let mut sim = running_sim();
        sim.snake.cells = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
            Cell::new(4, 6),
        ]);
        sim.snake.heading = Direction::West;
        sim.snake.pending = Direction::West;
        sim.food.items.clear();
        sim.request_direction(Direction::South);
        sim.tick();
        assert_eq!(sim.phase(), Phase::GameOver(Collision::SelfBite));
        assert!(sim.tick_timer().period().is_none());
    }

    #[test]
    fn game_over_ignores_everything_but_restart() {
        let mut sim = running_sim();
        sim.snake.cells = VecDeque::from([Cell::new(19, 5), Cell::new(18, 5), Cell::new(17, 5)]);
        sim.tick();
        let over = sim.snapshot();
        sim.request_direction(Direction::North);
        sim.toggle_pause();
        sim.countdown_step();
        sim.tick();
        assert_eq!(sim.snapshot(), over);
        assert_eq!(sim.snake.pending, Direction::East);
        sim.restart();
        assert_eq!(sim.phase(), Phase::Countdown(5));
    }

    #[test]
    fn eating_grows_scores_and_colors() {
        let mut sim = running_sim();
        let generation = sim.tick_timer().generation();
        feed(&mut sim, Channel::Red);
        let snap = sim.snapshot();
        assert_eq!(snap.score, 1);
        assert_eq!(snap.snake.len(), 4);
        assert_eq!(snap.snake[0], Cell::new(8, 10));
        assert_eq!(snap.eaten[Channel::Red], 1);
        assert!((1..=3).contains(&snap.food.len()));
        assert!(snap.food.iter().all(|f| !snap.snake.contains(&f.position)));
        let levels = sim.color.levels();
        assert_close(levels[Channel::Red], 0.55);
        assert_close(levels[Channel::Green], 0.75);
        assert_close(levels[Channel::Blue], 0.65);
        assert!(sim.tick_timer().generation() > generation, "timer not restarted");
        assert_eq!(
            sim.take_notifications(),
            [Notification::ScoreChanged(1)]
        );
    }

    #[test]
    fn acceleration() {
        let mut sim = running_sim();
        sim.score = 4;
        feed(&mut sim, Channel::Blue);
        assert_eq!(sim.score, 5);
        assert_close(sim.tick_seconds, 0.295);
        assert_eq!(sim.tick_timer().period(), Some(sim.tick_seconds));
        feed(&mut sim, Channel::Blue);
        assert_close(sim.tick_seconds, 0.295);
        sim.score = 9;
        feed(&mut sim, Channel::Green);
        assert_close(sim.tick_seconds, 0.290);
    }

    #[test]
    fn acceleration_clamps_at_minimum() {
        let mut sim = running_sim();
        let mut accelerations = 0;
        // Run the speed all the way down by scoring along a long loop
        for _ in 0..60 {
            sim.snake.cells = VecDeque::from([Cell::new(2, 2), Cell::new(1, 2), Cell::new(0, 2)]);
            sim.snake.heading = Direction::East;
            sim.snake.pending = Direction::East;
            sim.score = 4;
            let before = sim.tick_seconds;
            feed(&mut sim, Channel::Red);
            if sim.tick_seconds < before {
                accelerations += 1;
            }
            assert!(sim.tick_seconds >= 0.06 - 1e-9);
        }
        assert_eq!(accelerations, 48);
        assert_close(sim.tick_seconds, 0.06);
    }

    #[test]
    fn new_best_emitted_once() {
        let mut sim = running_sim();
        feed(&mut sim, Channel::Red);
        sim.snake.cells = VecDeque::from([Cell::new(19, 5), Cell::new(18, 5), Cell::new(17, 5)]);
        sim.snake.heading = Direction::East;
        sim.snake.pending = Direction::East;
        sim.tick();
        sim.tick();
        let notes = sim.take_notifications();
        assert_eq!(
            notes
                .iter()
                .filter(|n| matches!(n, Notification::NewBest { .. }))
                .collect::<Vec<_>>(),
            [&Notification::NewBest {
                difficulty: Difficulty::Normal,
                score: 1
            }]
        );
        assert!(notes.contains(&Notification::PhaseChanged(Phase::GameOver(Collision::Wall))));
        assert_eq!(sim.snapshot().best_score, 1);
    }

    #[test]
    fn no_new_best_below_record() {
        let mut sim = new_sim(Difficulty::Normal, 3);
        for _ in 0..5 {
            sim.countdown_step();
        }
        feed(&mut sim, Channel::Red);
        sim.snake.cells = VecDeque::from([Cell::new(19, 5), Cell::new(18, 5), Cell::new(17, 5)]);
        sim.tick();
        assert!(!sim
            .take_notifications()
            .iter()
            .any(|n| matches!(n, Notification::NewBest { .. })));
        assert_eq!(sim.snapshot().best_score, 3);
    }

    #[test]
    fn random_play_keeps_invariants() {
        let mut driver = ChaCha12Rng::seed_from_u64(RNG_SEED ^ 0xFFFF);
        let mut sim = new_sim(Difficulty::Advanced, 0);
        let minimum = Difficulty::Advanced.profile().minimum_tick;
        let directions = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        for _ in 0..5000 {
            match driver.random_range(0..10) {
                0 => {
                    if let Some(&d) = directions.choose(&mut driver) {
                        sim.request_direction(d);
                    }
                }
                1 => sim.countdown_step(),
                2 if driver.random_bool(0.1) => sim.toggle_pause(),
                _ => sim.tick(),
            }
            if matches!(sim.phase(), Phase::GameOver(_)) {
                sim.restart();
            }
            let snap = sim.snapshot();
            let cells = snap.snake.iter().collect::<HashSet<_>>();
            assert_eq!(cells.len(), snap.snake.len(), "snake overlaps itself");
            assert!(snap.snake.len() >= 3);
            assert!(snap.tick_seconds >= minimum - 1e-9);
            if matches!(snap.phase, Phase::Running | Phase::Paused) {
                assert!((1..=3).contains(&snap.food.len()));
            }
            let spots = snap.food.iter().map(|f| f.position).collect::<HashSet<_>>();
            assert_eq!(spots.len(), snap.food.len(), "food stacked");
            assert!(snap.food.iter().all(|f| !cells.contains(&f.position)));
            assert!(snap.food.iter().all(|f| snap.board.contains(f.position)));
        }
    }
}
