use std::fmt;

/// A cell on the board.  `x` grows rightwards and `y` grows downwards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Cell {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Cell {
    pub(crate) const fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The playing field.
///
/// The board spans `0 <= x < cols` horizontally but `-1 <= y < rows - 1`
/// vertically: there is one row of slack above the nominal top edge and one
/// fewer row at the bottom.  Both wall collisions and food placement use
/// this range, and the renderer draws row `y` at screen row `y + 1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    pub(crate) rows: i32,
    pub(crate) cols: i32,
}

impl Board {
    pub(crate) const TOP: i32 = -1;

    pub(crate) fn new(rows: i32, cols: i32) -> Board {
        Board { rows, cols }
    }

    pub(crate) fn bottom(self) -> i32 {
        self.rows - 1
    }

    pub(crate) fn contains(self, cell: Cell) -> bool {
        (0..self.cols).contains(&cell.x) && (Self::TOP..self.bottom()).contains(&cell.y)
    }

    /// Iterate over every cell on the board, row by row
    pub(crate) fn cells(self) -> impl Iterator<Item = Cell> {
        (Self::TOP..self.bottom())
            .flat_map(move |y| (0..self.cols).map(move |x| Cell::new(x, y)))
    }

    /// Iterate over every cell for which `occupied` returns false
    pub(crate) fn free_cells<F>(self, occupied: F) -> impl Iterator<Item = Cell>
    where
        F: Fn(Cell) -> bool,
    {
        self.cells().filter(move |&c| !occupied(c))
    }

    /// Offset from the top of the drawn board at which row `y` appears
    pub(crate) fn screen_row(self, y: i32) -> Option<u16> {
        u16::try_from(y - Self::TOP).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Cell::new(0, 0), true)]
    #[case(Cell::new(19, 18), true)]
    #[case(Cell::new(5, -1), true)]
    #[case(Cell::new(5, -2), false)]
    #[case(Cell::new(5, 19), false)]
    #[case(Cell::new(-1, 5), false)]
    #[case(Cell::new(20, 5), false)]
    fn test_contains(#[case] cell: Cell, #[case] inside: bool) {
        assert_eq!(Board::new(20, 20).contains(cell), inside);
    }

    #[test]
    fn cells_cover_board_exactly() {
        let board = Board::new(4, 3);
        let cells = board.cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells.first(), Some(&Cell::new(0, -1)));
        assert_eq!(cells.last(), Some(&Cell::new(2, 2)));
        assert!(cells.iter().all(|&c| board.contains(c)));
    }

    #[test]
    fn free_cells_skip_occupied() {
        let board = Board::new(2, 2);
        let free = board
            .free_cells(|c| c == Cell::new(0, -1) || c == Cell::new(1, 0))
            .collect::<Vec<_>>();
        assert_eq!(free, [Cell::new(1, -1), Cell::new(0, 0)]);
    }

    #[test]
    fn screen_rows() {
        let board = Board::new(20, 20);
        assert_eq!(board.screen_row(-1), Some(0));
        assert_eq!(board.screen_row(18), Some(19));
        assert_eq!(board.screen_row(-2), None);
    }
}
