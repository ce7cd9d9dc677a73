use crate::{Cell, GridInt, TermInt};
use crate::config::{Palette, Rgb};
use crate::game::{Erase, Frame};
use crate::grid::Grid;
use crate::runner::{Controls, Display, Input};
use crate::snake::Direction;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, read, poll};

// Every grid cell is two terminal columns wide so it comes out roughly square
const CELL_WIDTH: TermInt = 2;
const FILLED_CELL: &str = "██";
const EMPTY_CELL: &str = "  ";

/// Largest grid whose bordered board still has a size a terminal can report.
pub const MAX_GRID_WIDTH: GridInt = ((TermInt::MAX - 2) / CELL_WIDTH) as GridInt;
pub const MAX_GRID_HEIGHT: GridInt = (TermInt::MAX - 2) as GridInt;

struct Colors {
    snake: Color,
    food: Color,
    border: Color,
    background: Color,
}

impl From<&Palette> for Colors {
    fn from(palette: &Palette) -> Self {
        Colors {
            snake: rgb(palette.snake),
            food: rgb(palette.food),
            border: rgb(palette.border),
            background: rgb(palette.background),
        }
    }
}

fn rgb([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Draws the board on the terminal. The board is centered and surrounded by
/// a one character border.
pub struct TermManager {
    grid: Grid,
    origin: (TermInt, TermInt),
    board: (TermInt, TermInt),
    stdout: Stdout,
    colors: Colors,
}

impl TermManager {
    pub fn new(grid: Grid, palette: &Palette) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let Some((board_w, board_h)) = board_size(&grid) else {
            bail!("A {}x{} board does not fit on any terminal", grid.width(), grid.height());
        };

        if board_w > width || board_h > height {
            bail!(
                "A {}x{} board needs a terminal of at least {}x{}, this one is {}x{}",
                grid.width(),
                grid.height(),
                board_w,
                board_h,
                width,
                height
            );
        }

        let origin = ((width - board_w) / 2, (height - board_h) / 2);
        Ok(TermManager {
            grid,
            origin,
            board: (board_w, board_h),
            stdout: stdout(),
            colors: Colors::from(palette),
        })
    }

    pub fn setup(&mut self, title: &str) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, SetTitle(title)).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        queue!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All)).context("Error clearing")?;

        let grid = self.grid;
        for cell in grid.cells() {
            self.erase_cell(cell)?;
        }

        self.draw_borders()
    }

    pub fn draw_borders(&mut self) -> Result<()> {
        let (width, height) = self.board;
        let (left, top) = self.origin;
        let (right, bottom) = (left + width - 1, top + height - 1);

        queue!(self.stdout, SetBackgroundColor(self.colors.background), SetForegroundColor(self.colors.border))?;

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            queue!(self.stdout, cursor::MoveTo(x, top), Print(ch), cursor::MoveTo(x, bottom), Print(ch))?;
        }

        for y in top + 1..bottom {
            queue!(self.stdout, cursor::MoveTo(left, y), Print('|'), cursor::MoveTo(right, y), Print('|'))?;
        }

        Ok(())
    }

    pub fn paint_cell(&mut self, cell: Cell, color: Color) -> Result<()> {
        let (x, y) = self.screen_position(cell);
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            SetBackgroundColor(self.colors.background),
            SetForegroundColor(color),
            Print(FILLED_CELL)
        )?;
        Ok(())
    }

    pub fn erase_cell(&mut self, cell: Cell) -> Result<()> {
        let (x, y) = self.screen_position(cell);
        queue!(self.stdout, cursor::MoveTo(x, y), SetBackgroundColor(self.colors.background), Print(EMPTY_CELL))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn screen_position(&self, cell: Cell) -> (TermInt, TermInt) {
        screen_position(self.origin, cell)
    }
}

impl Display for TermManager {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        match frame.erase {
            Erase::Board => self.clear()?,
            Erase::Cell(cell) => self.erase_cell(cell)?,
            Erase::Nothing => {}
        }

        self.paint_cell(frame.food, self.colors.food)?;
        for &cell in frame.segments {
            self.paint_cell(cell, self.colors.snake)?;
        }

        self.flush()
    }
}

/// Reads whatever keys were pressed since the last poll without blocking.
pub struct Keyboard;

impl Keyboard {
    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0)).context("Error polling input")? {
            if let Event::Key(ev) = read().context("Error reading input")? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

impl Controls for Keyboard {
    fn poll(&mut self) -> Result<Input> {
        Ok(latest_input(&self.read_key_events_queue()?))
    }
}

/// Folds a batch of key events into one input: any exit request wins,
/// otherwise the last direction key counts.
pub fn latest_input(events: &[KeyEvent]) -> Input {
    events
        .iter()
        .filter(|ev| ev.kind == KeyEventKind::Press)
        .filter_map(key_input)
        .fold(Input::Idle, |acc, input| match (acc, input) {
            (Input::Exit, _) | (_, Input::Exit) => Input::Exit,
            (_, input) => input,
        })
}

pub fn key_input(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Exit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Input::Turn(Direction::Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Input::Turn(Direction::Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Input::Turn(Direction::Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Input::Turn(Direction::Right)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Input::Exit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Terminal columns and rows taken by the board including its border, or
/// `None` past what a terminal size can hold.
fn board_size(grid: &Grid) -> Option<(TermInt, TermInt)> {
    let columns = u32::try_from(grid.width()).ok()?.checked_mul(CELL_WIDTH as u32)?.checked_add(2)?;
    let rows = u32::try_from(grid.height()).ok()?.checked_add(2)?;

    Some((TermInt::try_from(columns).ok()?, TermInt::try_from(rows).ok()?))
}

// Only called for cells of a board that passed `board_size`
fn screen_position(origin: (TermInt, TermInt), cell: Cell) -> (TermInt, TermInt) {
    (origin.0 + 1 + cell.0 as TermInt * CELL_WIDTH, origin.1 + 1 + cell.1 as TermInt)
}
