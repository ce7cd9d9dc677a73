//! Classic snake on a wrapping grid: eat food to grow, run into yourself to
//! start over.

pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod runner;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type GridInt = i32;
pub type Cell = (GridInt, GridInt);
