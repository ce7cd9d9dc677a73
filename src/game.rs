use log::{debug, info};
use rand::Rng;

use crate::food::Food;
use crate::grid::{Grid, GridError};
use crate::snake::{Direction, Snake};
use crate::Cell;

/// What the display has to wipe before drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erase {
    Nothing,
    Cell(Cell),
    Board,
}

/// Everything the display needs to bring the screen up to date after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub segments: &'a [Cell],
    pub food: Cell,
    pub erase: Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub erase: Erase,
    pub ate: bool,
    pub reset: bool,
}

pub struct Game<R: Rng> {
    grid: Grid,
    snake: Snake,
    food: Food,
    rng: R,
    ticks: u64,
    eaten: u32,
}

impl<R: Rng> Game<R> {
    /// A fresh game: one-segment snake in the middle of the board with a
    /// random heading, food somewhere else.
    pub fn new(grid: Grid, mut rng: R) -> Result<Self, GridError> {
        let snake = Snake::new(grid.center(), Direction::random(&mut rng));
        let food = Food::spawn(&grid, snake.segments(), &mut rng)?;
        Ok(Game::with_state(grid, snake, food, rng))
    }

    pub fn with_state(grid: Grid, snake: Snake, food: Food, rng: R) -> Self {
        Game { grid, snake, food, rng, ticks: 0, eaten: 0 }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Food eaten since the last reset.
    pub fn eaten(&self) -> u32 {
        self.eaten
    }

    pub fn tick(&mut self, request: Option<Direction>) -> Result<Tick, GridError> {
        self.ticks += 1;

        if let Some(dir) = request {
            self.snake.set_heading(dir);
        }

        let step = self.snake.advance(&self.grid);

        // Food first, then collision
        let ate = step.new_head == self.food.location();
        if ate {
            self.snake.grow();
            self.eaten += 1;
            self.food.relocate(&self.grid, self.snake.segments(), &mut self.rng)?;
            debug!(
                "Tick {}: ate food at {:?}, target length {}, next food at {:?}",
                self.ticks,
                step.new_head,
                self.snake.target_length(),
                self.food.location()
            );
        }

        if self.snake.has_self_collision() {
            info!(
                "Tick {}: ran into itself at {:?} after eating {} food, restarting",
                self.ticks,
                step.new_head,
                self.eaten
            );

            let heading = Direction::random(&mut self.rng);
            self.snake.reset(heading);
            self.eaten = 0;
            self.food.relocate(&self.grid, self.snake.segments(), &mut self.rng)?;

            return Ok(Tick { erase: Erase::Board, ate, reset: true });
        }

        let erase = match step.vacated {
            Some(cell) => Erase::Cell(cell),
            None => Erase::Nothing,
        };

        Ok(Tick { erase, ate, reset: false })
    }

    /// Frame for the state after `tick`.
    pub fn frame(&self, tick: &Tick) -> Frame<'_> {
        Frame { segments: self.snake.segments(), food: self.food.location(), erase: tick.erase }
    }

    /// Frame that paints the current state on a blank board.
    pub fn full_frame(&self) -> Frame<'_> {
        Frame { segments: self.snake.segments(), food: self.food.location(), erase: Erase::Board }
    }
}
