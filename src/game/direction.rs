use super::grid::Cell;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Return the cell one step from `cell` in this direction.  No bounds
    /// checking is done here; walls are the board's business.
    pub(crate) fn step(self, cell: Cell) -> Cell {
        let Cell { x, y } = cell;
        match self {
            Direction::North => Cell::new(x, y - 1),
            Direction::East => Cell::new(x + 1, y),
            Direction::South => Cell::new(x, y + 1),
            Direction::West => Cell::new(x - 1, y),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::North, Cell::new(2, 7), Cell::new(2, 6))]
    #[case(Direction::South, Cell::new(2, 7), Cell::new(2, 8))]
    #[case(Direction::East, Cell::new(2, 7), Cell::new(3, 7))]
    #[case(Direction::West, Cell::new(2, 7), Cell::new(1, 7))]
    #[case(Direction::North, Cell::new(0, 0), Cell::new(0, -1))]
    #[case(Direction::West, Cell::new(0, 0), Cell::new(-1, 0))]
    fn test_step(#[case] d: Direction, #[case] from: Cell, #[case] to: Cell) {
        assert_eq!(d.step(from), to);
    }

    #[rstest]
    #[case(Direction::North)]
    #[case(Direction::East)]
    #[case(Direction::South)]
    #[case(Direction::West)]
    fn reverse_undoes_step(#[case] d: Direction) {
        let start = Cell::new(4, 4);
        assert_ne!(d.reverse(), d);
        assert_eq!(d.reverse().reverse(), d);
        assert_eq!(d.reverse().step(d.step(start)), start);
    }
}
