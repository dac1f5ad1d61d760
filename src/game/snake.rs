use super::direction::Direction;
use super::grid::{Board, Cell};
use crate::consts;
use std::collections::VecDeque;

/// Snake state.  Snate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells making up the snake, head first.  Never contains
    /// duplicates.
    pub(super) cells: VecDeque<Cell>,

    /// The direction in which the snake moved on the last tick
    pub(super) heading: Direction,

    /// The direction the snake will move in on the next tick.  This is never
    /// the reverse of `heading`.
    pub(super) pending: Direction,
}

impl Snake {
    /// Create a new snake lying horizontally a quarter of the way across the
    /// board's middle row, facing east.
    pub(crate) fn new(board: Board) -> Snake {
        let start_x = board.cols / 4;
        let mid_y = board.rows / 2;
        let length = i32::from(consts::INITIAL_SNAKE_LENGTH);
        let cells = (start_x..start_x + length)
            .rev()
            .map(|x| Cell::new(x, mid_y))
            .collect();
        Snake {
            cells,
            heading: Direction::East,
            pending: Direction::East,
        }
    }

    pub(crate) fn head(&self) -> Cell {
        self.cells[0]
    }

    pub(crate) fn heading(&self) -> Direction {
        self.heading
    }

    pub(crate) fn cells(&self) -> &VecDeque<Cell> {
        &self.cells
    }

    /// Buffer a turn to be applied on the next tick.  A request to reverse
    /// directly into the snake's own neck is dropped.
    pub(crate) fn request_direction(&mut self, direction: Direction) {
        if direction != self.heading.reverse() {
            self.pending = direction;
        }
    }

    pub(crate) fn apply_heading(&mut self) {
        self.heading = self.pending;
    }

    /// The cell the head will move into given the current heading
    pub(crate) fn next_head(&self) -> Cell {
        self.heading.step(self.head())
    }

    /// Is `cell` part of the snake's current body (head included)?
    pub(crate) fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Apply the pending heading and move one cell forwards.  If `grow` is
    /// true, the tail stays put and the snake gets one cell longer.
    pub(crate) fn advance(&mut self, grow: bool) {
        self.apply_heading();
        let head = self.next_head();
        self.cells.push_front(head);
        if !grow {
            let _ = self.cells.pop_back();
        }
    }
}
