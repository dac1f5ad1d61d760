use super::color::Channel;
use super::grid::{Board, Cell};
use super::snake::Snake;
use crate::consts;
use crate::util::EnumExt;
use rand::{seq::IteratorRandom, Rng};

/// A herb sitting on the board
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Food {
    pub(crate) position: Cell,
    pub(crate) channel: Channel,

    /// Seconds until the food rots away
    pub(crate) lifetime_remaining: f64,

    /// Whether the food should currently be drawn.  Only ever false while
    /// flickering.
    pub(crate) flash_visible: bool,

    /// Seconds accumulated toward the next flicker toggle
    pub(crate) flash_accumulator: f64,
}

impl Food {
    pub(crate) fn new(position: Cell, channel: Channel) -> Food {
        Food {
            position,
            channel,
            lifetime_remaining: consts::FOOD_LIFETIME,
            flash_visible: true,
            flash_accumulator: 0.0,
        }
    }

    /// Is the food in the last few seconds of its life?
    pub(crate) fn flickering(&self) -> bool {
        self.lifetime_remaining <= consts::FLICKER_WINDOW + consts::EPSILON
    }

    fn expired(&self) -> bool {
        self.lifetime_remaining <= consts::EPSILON
    }

    /// Age the food by `delta` seconds, updating its flicker state.  Returns
    /// `false` if the food has rotted away.
    fn age(&mut self, delta: f64) -> bool {
        self.lifetime_remaining -= delta;
        if self.expired() {
            return false;
        }
        if self.flickering() {
            let period = 1.0 / consts::FLICKER_FREQUENCY;
            self.flash_accumulator += delta;
            // A long enough step can toggle more than once.
            loop {
                if self.flash_accumulator < period {
                    break;
                }
                self.flash_accumulator -= period;
                self.flash_visible = !self.flash_visible;
            }
        } else {
            self.flash_visible = true;
            self.flash_accumulator = 0.0;
        }
        true
    }
}

/// The set of food items currently on the board
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Pantry {
    pub(super) items: Vec<Food>,
}

impl Pantry {
    pub(crate) fn items(&self) -> &[Food] {
        &self.items
    }

    fn occupies(&self, cell: Cell) -> bool {
        self.items.iter().any(|f| f.position == cell)
    }

    /// Discard all food and lay out a fresh random batch of 1 to 3 items
    pub(crate) fn spawn_initial<R: Rng>(&mut self, rng: &mut R, board: Board, snake: &Snake) {
        self.items.clear();
        let count = rng.random_range(consts::MIN_FOODS..=consts::MAX_FOODS);
        for _ in 0..count {
            if let Some(food) = self.make_food(rng, board, snake, &[]) {
                self.items.push(food);
            }
        }
    }

    /// Top the pantry back up to a freshly-chosen random target of 1 to 3
    /// items.  Stops early if the board has no room left.
    pub(crate) fn refill<R: Rng>(&mut self, rng: &mut R, board: Board, snake: &Snake) {
        let target = rng.random_range(consts::MIN_FOODS..=consts::MAX_FOODS);
        while self.items.len() < target {
            let Some(food) = self.make_food(rng, board, snake, &[]) else {
                break;
            };
            self.items.push(food);
        }
    }

    /// Remove & return the food at `cell`, if any.  Visibility does not
    /// matter.
    pub(crate) fn take_at(&mut self, cell: Cell) -> Option<Food> {
        let i = self.items.iter().position(|f| f.position == cell)?;
        Some(self.items.remove(i))
    }

    /// Age every item by `delta` seconds.  Items that rot away are replaced
    /// immediately by a new random item if there's room.  A replacement never
    /// lands where any item stood before this call or on another
    /// replacement.
    pub(crate) fn advance<R: Rng>(&mut self, delta: f64, rng: &mut R, board: Board, snake: &Snake) {
        let previous = self.items.iter().map(|f| f.position).collect::<Vec<_>>();
        let before = self.items.len();
        self.items.retain_mut(|food| {
            let fresh = food.age(delta);
            if !fresh {
                tracing::trace!(position = %food.position, channel = ?food.channel, "food rotted away");
            }
            fresh
        });
        for _ in self.items.len()..before {
            // Replacements already pushed onto `items` are excluded by
            // `make_food` itself.
            match self.make_food(rng, board, snake, &previous) {
                Some(food) => self.items.push(food),
                None => break,
            }
        }
    }

    /// Create a food item of a random channel at a random cell not occupied
    /// by the snake, by existing food, or by anything in `blocked`
    fn make_food<R: Rng>(
        &self,
        rng: &mut R,
        board: Board,
        snake: &Snake,
        blocked: &[Cell],
    ) -> Option<Food> {
        let position = board
            .free_cells(|c| snake.occupies(c) || self.occupies(c) || blocked.contains(&c))
            .choose(rng)?;
        let channel = Channel::iter().choose(rng)?;
        Some(Food::new(position, channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::direction::Direction;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::HashSet;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn setup() -> (ChaCha12Rng, Board, Snake) {
        let board = Board::new(20, 20);
        (
            ChaCha12Rng::seed_from_u64(RNG_SEED),
            board,
            Snake::new(board),
        )
    }

    fn is_fresh(food: &Food) -> bool {
        (food.lifetime_remaining - consts::FOOD_LIFETIME).abs() < consts::EPSILON
    }

    fn assert_well_placed(pantry: &Pantry, board: Board, snake: &Snake) {
        let mut seen = HashSet::new();
        for food in pantry.items() {
            assert!(board.contains(food.position), "{} off board", food.position);
            assert!(!snake.occupies(food.position), "{} under snake", food.position);
            assert!(seen.insert(food.position), "{} doubled up", food.position);
        }
    }

    #[test]
    fn spawn_initial_places_one_to_three() {
        let (mut rng, board, snake) = setup();
        let mut pantry = Pantry::default();
        for _ in 0..50 {
            pantry.spawn_initial(&mut rng, board, &snake);
            assert!((1..=3).contains(&pantry.items().len()));
            assert_well_placed(&pantry, board, &snake);
            assert!(pantry
                .items()
                .iter()
                .all(|f| f.flash_visible && is_fresh(f)));
        }
    }

    #[test]
    fn refill_never_removes() {
        let (mut rng, board, snake) = setup();
        let mut pantry = Pantry::default();
        pantry.items = vec![
            Food::new(Cell::new(0, 0), Channel::Red),
            Food::new(Cell::new(1, 0), Channel::Green),
            Food::new(Cell::new(2, 0), Channel::Blue),
        ];
        pantry.refill(&mut rng, board, &snake);
        assert_eq!(pantry.items().len(), 3);
        pantry.items.truncate(0);
        pantry.refill(&mut rng, board, &snake);
        assert!((1..=3).contains(&pantry.items().len()));
        assert_well_placed(&pantry, board, &snake);
    }

    #[test]
    fn refill_on_full_board_is_noop() {
        let (mut rng, _, _) = setup();
        // A 1x4 board: y ranges over -1..3, x over 0..1
        let board = Board::new(4, 1);
        let snake = Snake {
            cells: [Cell::new(0, -1), Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)].into(),
            heading: Direction::North,
            pending: Direction::North,
        };
        let mut pantry = Pantry::default();
        pantry.refill(&mut rng, board, &snake);
        assert_eq!(pantry.items().len(), 0);
        pantry.spawn_initial(&mut rng, board, &snake);
        assert_eq!(pantry.items().len(), 0);
    }

    #[test]
    fn take_at_ignores_visibility() {
        let mut pantry = Pantry::default();
        let mut food = Food::new(Cell::new(3, 3), Channel::Blue);
        food.flash_visible = false;
        pantry.items.push(food);
        assert!(pantry.take_at(Cell::new(3, 4)).is_none());
        let eaten = pantry.take_at(Cell::new(3, 3)).unwrap();
        assert_eq!(eaten.channel, Channel::Blue);
        assert_eq!(pantry.items().len(), 0);
    }

    #[test]
    fn flicker_starts_at_tick_30_and_expiry_at_tick_40() {
        let (mut rng, board, snake) = setup();
        let original = Cell::new(15, 2);
        let mut pantry = Pantry::default();
        pantry.items.push(Food::new(original, Channel::Red));
        for tick in 1..=39 {
            pantry.advance(0.30, &mut rng, board, &snake);
            assert_eq!(pantry.items().len(), 1);
            let food = &pantry.items()[0];
            assert_eq!(food.position, original, "replaced early at tick {tick}");
            assert_eq!(food.flickering(), tick >= 30, "at tick {tick}");
            if tick < 30 {
                assert!(food.flash_visible);
            }
        }
        pantry.advance(0.30, &mut rng, board, &snake);
        assert_eq!(pantry.items().len(), 1);
        let replacement = &pantry.items()[0];
        assert!(is_fresh(replacement));
        assert!(replacement.flash_visible);
        assert_well_placed(&pantry, board, &snake);
    }

    #[test]
    fn flicker_toggles_at_three_hertz() {
        let mut food = Food::new(Cell::new(0, 0), Channel::Green);
        food.lifetime_remaining = 3.1;
        // Enters the window; 0.2s is under one period
        assert!(food.age(0.2));
        assert!(food.flash_visible);
        // 0.4s accumulated: one toggle
        assert!(food.age(0.2));
        assert!(!food.flash_visible);
        // 0.733...s accumulated: two toggles total
        assert!(food.age(1.0 / 3.0));
        assert!(food.flash_visible);
    }

    #[test]
    fn large_delta_toggles_repeatedly() {
        let mut food = Food::new(Cell::new(0, 0), Channel::Green);
        food.lifetime_remaining = 2.5;
        // 1.1s spans three whole periods
        assert!(food.age(1.1));
        assert!(!food.flash_visible);
        assert!(food.flash_accumulator < 1.0 / 3.0);
    }

    #[test]
    fn outside_window_forces_visible() {
        let mut food = Food::new(Cell::new(0, 0), Channel::Green);
        food.flash_visible = false;
        food.flash_accumulator = 0.2;
        assert!(food.age(0.3));
        assert!(food.flash_visible);
        assert!(food.flash_accumulator.abs() < consts::EPSILON);
    }

    #[test]
    fn simultaneous_expiry_replacements_do_not_overlap() {
        let (mut rng, _, _) = setup();
        let board = Board::new(3, 2);
        let snake = Snake {
            cells: [Cell::new(0, -1), Cell::new(1, -1), Cell::new(1, 0)].into(),
            heading: Direction::West,
            pending: Direction::West,
        };
        let mut pantry = Pantry::default();
        for cell in [Cell::new(0, 0), Cell::new(0, 1)] {
            let mut food = Food::new(cell, Channel::Red);
            food.lifetime_remaining = 0.1;
            pantry.items.push(food);
        }
        pantry.advance(0.3, &mut rng, board, &snake);
        // Only (1, 1) is clear of both the snake and the rotted items, so
        // only one replacement fits.
        assert_eq!(pantry.items().len(), 1);
        assert_eq!(pantry.items()[0].position, Cell::new(1, 1));
    }
}
