use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::Result;
use log::info;
use rand::Rng;

use crate::game::{Frame, Game};
use crate::snake::Direction;

/// What the player asked for since the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Idle,
    Turn(Direction),
    Exit,
}

pub trait Controls {
    /// Non-blocking. Reports the most recent direction request since the last
    /// call, or `Exit` if one was seen at all.
    fn poll(&mut self) -> Result<Input>;
}

pub trait Display {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Fixed-rate clock. Falls back to "now" if a tick overran its slot instead
/// of trying to catch up.
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(ticks_per_second: u32) -> Self {
        let period = Duration::from_secs(1) / ticks_per_second.max(1);
        Ticker { period, next: Instant::now() + period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn wait(&mut self) {
        let now = Instant::now();

        if self.next > now {
            sleep(self.next - now);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}

/// Runs the game until the controls ask to exit. Returns the number of ticks
/// played.
pub fn run<R, C, D>(game: &mut Game<R>, controls: &mut C, display: &mut D, ticker: &mut Ticker) -> Result<u64>
where
    R: Rng,
    C: Controls + ?Sized,
    D: Display + ?Sized,
{
    display.present(&game.full_frame())?;

    loop {
        ticker.wait();

        let request = match controls.poll()? {
            Input::Exit => {
                info!("Exit requested after {} ticks", game.ticks());
                return Ok(game.ticks());
            }
            Input::Turn(dir) => Some(dir),
            Input::Idle => None,
        };

        let tick = game.tick(request)?;
        display.present(&game.frame(&tick))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::Food;
    use crate::game::Erase;
    use crate::grid::Grid;
    use crate::snake::Snake;
    use crate::Cell;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use Direction::*;

    struct Script(VecDeque<Input>);

    impl Controls for Script {
        fn poll(&mut self) -> Result<Input> {
            Ok(self.0.pop_front().unwrap_or(Input::Exit))
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Vec<Cell>, Cell, Erase)>,
    }

    impl Display for Recorder {
        fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
            self.frames.push((frame.segments.to_vec(), frame.food, frame.erase));
            Ok(())
        }
    }

    struct Broken;

    impl Display for Broken {
        fn present(&mut self, _frame: &Frame<'_>) -> Result<()> {
            anyhow::bail!("screen went away")
        }
    }

    fn game() -> Game<StdRng> {
        Game::with_state(Grid::new(10, 10), Snake::new((5, 5), Right), Food::new((0, 0)), StdRng::seed_from_u64(2))
    }

    #[test]
    fn test_ticker_period() {
        assert_eq!(Ticker::new(5).period(), Duration::from_millis(200));
        assert_eq!(Ticker::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn test_run_until_exit() {
        let mut game = game();
        let mut controls = Script(VecDeque::from(vec![Input::Idle, Input::Turn(Down), Input::Turn(Up), Input::Exit]));
        let mut display = Recorder::default();

        let ticks = run(&mut game, &mut controls, &mut display, &mut Ticker::new(1000)).unwrap();

        assert_eq!(ticks, 3);
        assert_eq!(
            display.frames,
            vec![
                (vec![(5, 5)], (0, 0), Erase::Board),
                (vec![(6, 5)], (0, 0), Erase::Cell((5, 5))),
                (vec![(6, 6)], (0, 0), Erase::Cell((6, 5))),
                // Up is a reversal of Down and gets ignored
                (vec![(6, 7)], (0, 0), Erase::Cell((6, 6))),
            ]
        );
    }

    #[test]
    fn test_exit_before_first_tick() {
        let mut game = game();
        let mut display = Recorder::default();

        let ticks = run(&mut game, &mut Script(VecDeque::new()), &mut display, &mut Ticker::new(1000)).unwrap();

        assert_eq!(ticks, 0);
        assert_eq!(display.frames.len(), 1);
    }

    #[test]
    fn test_display_errors_stop_the_loop() {
        let mut game = game();
        let res = run(&mut game, &mut Script(VecDeque::new()), &mut Broken, &mut Ticker::new(1000));
        assert!(res.is_err());
    }
}
