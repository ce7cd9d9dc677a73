use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::snake::Direction;
use crate::{Cell, GridInt};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("no free cell left on a {width}x{height} grid")]
    Full { width: GridInt, height: GridInt },
}

/// Wraps a coordinate that moved at most one `cell_size` past either end of
/// an axis `axis_size` units long back onto the axis.
pub fn wrap(coordinate: GridInt, axis_size: GridInt, cell_size: GridInt) -> GridInt {
    debug_assert!(
        coordinate >= -cell_size && coordinate < axis_size + cell_size,
        "coordinate {} overshoots an axis of {} by more than one cell",
        coordinate,
        axis_size
    );

    coordinate.rem_euclid(axis_size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: GridInt,
    height: GridInt,
}

impl Grid {
    pub fn new(width: GridInt, height: GridInt) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        Grid { width, height }
    }

    /// Grid for a board measured in the same units as `cell_size`. `None` if
    /// the board holds no whole cell or is too large to address.
    pub fn from_board(board_width: u32, board_height: u32, cell_size: u32) -> Option<Self> {
        let width = GridInt::try_from(board_width.checked_div(cell_size)?).ok()?;
        let height = GridInt::try_from(board_height.checked_div(cell_size)?).ok()?;

        (width > 0 && height > 0).then_some(Grid { width, height })
    }

    pub fn width(&self) -> GridInt {
        self.width
    }

    pub fn height(&self) -> GridInt {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Cell {
        (self.width / 2, self.height / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.0) && (0..self.height).contains(&cell.1)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }

    /// The neighbour of `cell` along `direction`, wrapping at the edges.
    pub fn step(&self, cell: Cell, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        (wrap(cell.0 + dx, self.width, 1), wrap(cell.1 + dy, self.height, 1))
    }

    /// Picks uniformly among the cells not in `occupied`.
    pub fn random_free_cell<R: Rng + ?Sized>(
        &self,
        occupied: &[Cell],
        rng: &mut R,
    ) -> Result<Cell, GridError> {
        let choices: Vec<Cell> = self.cells().filter(|cell| !occupied.contains(cell)).collect();

        choices.choose(rng).copied().ok_or(GridError::Full {
            width: self.width,
            height: self.height,
        })
    }
}
