use rand::Rng;

use crate::grid::Grid;
use crate::Cell;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// The heading that results from asking to turn `requested` while moving
    /// along `self`, or `None` when the request would reverse the snake.
    pub fn turn(self, requested: Direction) -> Option<Direction> {
        if requested == self.opposite() {
            None
        } else {
            Some(requested)
        }
    }
}

/// What a single `advance` did to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub new_head: Cell,
    pub vacated: Option<Cell>,
}

#[derive(Debug, Clone)]
pub struct Snake {
    // Head first
    segments: Vec<Cell>,
    heading: Direction,
    // Heading of the last advance, reversal checks are made against it
    moved: Direction,
    target_length: usize,
    origin: Cell,
}

impl Snake {
    /// A one-segment snake sitting on `origin`, which is also where `reset`
    /// puts it back.
    pub fn new(origin: Cell, heading: Direction) -> Self {
        Snake { segments: vec![origin], heading, moved: heading, target_length: 1, origin }
    }

    /// A snake with an arbitrary body, head first. Its target length is the
    /// body length, so it keeps that length until it eats.
    pub fn from_segments(segments: Vec<Cell>, heading: Direction, origin: Cell) -> Self {
        assert!(!segments.is_empty(), "a snake needs at least one segment");
        let target_length = segments.len();
        Snake { segments, heading, moved: heading, target_length, origin }
    }

    pub fn segments(&self) -> &[Cell] {
        &self.segments
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn set_heading(&mut self, requested: Direction) {
        if let Some(heading) = self.moved.turn(requested) {
            self.heading = heading;
        }
    }

    pub fn advance(&mut self, grid: &Grid) -> Step {
        let new_head = grid.step(self.head(), self.heading);

        self.moved = self.heading;
        self.segments.insert(0, new_head);

        let vacated = if self.segments.len() > self.target_length {
            self.segments.pop()
        } else {
            None
        };

        Step { new_head, vacated }
    }

    pub fn has_self_collision(&self) -> bool {
        self.segments[1..].contains(&self.head())
    }

    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    pub fn reset(&mut self, heading: Direction) {
        self.segments.clear();
        self.segments.push(self.origin);
        self.target_length = 1;
        self.heading = heading;
        self.moved = heading;
    }
}
