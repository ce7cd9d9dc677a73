use rand::Rng;

use crate::grid::{Grid, GridError};
use crate::Cell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    location: Cell,
}

impl Food {
    pub fn new(location: Cell) -> Self {
        Food { location }
    }

    /// Food on a random cell outside `occupied`.
    pub fn spawn<R: Rng + ?Sized>(grid: &Grid, occupied: &[Cell], rng: &mut R) -> Result<Self, GridError> {
        grid.random_free_cell(occupied, rng).map(Food::new)
    }

    pub fn location(&self) -> Cell {
        self.location
    }

    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        occupied: &[Cell],
        rng: &mut R,
    ) -> Result<(), GridError> {
        self.location = grid.random_free_cell(occupied, rng)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_relocate_avoids_snake() {
        let grid = Grid::new(8, 6);
        let mut rng = StdRng::seed_from_u64(42);
        let mut food = Food::new((0, 0));

        for len in 1..grid.cell_count() {
            let occupied: Vec<Cell> = grid.cells().take(len).collect();
            food.relocate(&grid, &occupied, &mut rng).unwrap();
            assert!(!occupied.contains(&food.location()));
            assert!(grid.contains(food.location()));
        }
    }

    #[test]
    fn test_relocate_to_last_free_cell() {
        let grid = Grid::new(3, 3);
        let mut rng = StdRng::seed_from_u64(9);
        let occupied: Vec<Cell> = grid.cells().filter(|&cell| cell != (1, 1)).collect();
        let mut food = Food::new((0, 0));

        food.relocate(&grid, &occupied, &mut rng).unwrap();
        assert_eq!(food.location(), (1, 1));
    }

    #[test]
    fn test_relocate_on_full_grid_keeps_location() {
        let grid = Grid::new(2, 1);
        let mut rng = StdRng::seed_from_u64(9);
        let mut food = Food::new((1, 0));

        let res = food.relocate(&grid, &[(0, 0), (1, 0)], &mut rng);
        assert_eq!(res, Err(GridError::Full { width: 2, height: 1 }));
        assert_eq!(food.location(), (1, 0));
    }

    #[test]
    fn test_spawn() {
        let grid = Grid::new(2, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let food = Food::spawn(&grid, &[(0, 0)], &mut rng).unwrap();
        assert_eq!(food.location(), (1, 0));
    }
}
