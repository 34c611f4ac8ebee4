//! A plain array representation of a Connect 4 board

use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::fmt;
use std::io::Write;

use crate::{
    error::{EngineError, Result},
    HEIGHT, WIDTH, WIN_LENGTH,
};

/// One of the two players
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Side {
    PlayerOne,
    PlayerTwo,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::PlayerOne => Side::PlayerTwo,
            Side::PlayerTwo => Side::PlayerOne,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::PlayerOne => Cell::PlayerOne,
            Side::PlayerTwo => Cell::PlayerTwo,
        }
    }
}

// (row step, column step) of the horizontal, vertical, ascending and
// descending diagonal directions
static DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A 6x7 grid of cells
///
/// Gravity always holds: the occupied cells of a column form a run starting
/// at the bottom row. The grid does not know whose turn it is, every
/// mutation names the side that moves.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Position {
    cells: [Cell; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Creates an empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
        }
    }

    /// Creates a board from a string of column digits (`0` to `6`)
    ///
    /// Moves alternate between the two sides, starting with `Side::PlayerOne`.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut position = Self::new();
        let mut side = Side::PlayerOne;

        for (index, character) in moves.as_ref().chars().enumerate() {
            match character.to_digit(10) {
                Some(column) => {
                    position.drop(column as usize, side)?;
                    side = side.opponent();
                }
                None => return Err(EngineError::InvalidMoveCharacter { character, index }),
            }
        }
        Ok(position)
    }

    /// The cell at `row` (counted from the bottom) and `column`
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    /// Places a marker for `side` in the lowest empty cell of `column`
    ///
    /// Returns the row the marker landed in.
    pub fn drop(&mut self, column: usize, side: Side) -> Result<usize> {
        if column >= WIDTH {
            return Err(EngineError::ColumnOutOfRange { column });
        }
        let row = (0..HEIGHT)
            .find(|&row| self.cell(row, column).is_empty())
            .ok_or(EngineError::ColumnFull { column })?;

        self.cells[column + WIDTH * row] = side.into();
        Ok(row)
    }

    /// Whether the top cell of `column` is occupied
    ///
    /// Columns outside the board can never accept a marker and count as full.
    pub fn is_full(&self, column: usize) -> bool {
        column >= WIDTH || !self.cell(HEIGHT - 1, column).is_empty()
    }

    /// Whether every cell is occupied
    pub fn is_board_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// The number of markers on the board
    pub fn num_moves(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Whether `side` has four aligned markers in any direction
    pub fn has_won(&self, side: Side) -> bool {
        let cell = Cell::from(side);
        Self::windows(WIN_LENGTH).any(|window| self.window_filled(window, WIN_LENGTH, cell))
    }

    /// Whether the game is over, either won by a side or drawn on a full board
    pub fn is_terminal(&self) -> bool {
        self.has_won(Side::PlayerOne) || self.has_won(Side::PlayerTwo) || self.is_board_full()
    }

    /// Counts the lines of `length` consecutive cells that all belong to `side`
    ///
    /// Every starting cell and direction is counted separately, so overlapping
    /// lines are all included: a row of four contains two lines of three and
    /// three lines of two.
    pub fn count_run(&self, side: Side, length: usize) -> usize {
        if length == 0 {
            return 0;
        }
        let cell = Cell::from(side);
        Self::windows(length)
            .filter(|&window| self.window_filled(window, length, cell))
            .count()
    }

    /// Every (row, column, direction) where a line of `length` cells fits on
    /// the board
    fn windows(length: usize) -> impl Iterator<Item = (usize, usize, (isize, isize))> {
        DIRECTIONS.iter().flat_map(move |&direction| {
            (0..HEIGHT).flat_map(move |row| {
                (0..WIDTH).filter_map(move |column| {
                    Self::offset(row, column, direction, length - 1)
                        .map(|_| (row, column, direction))
                })
            })
        })
    }

    fn offset(
        row: usize,
        column: usize,
        (dy, dx): (isize, isize),
        steps: usize,
    ) -> Option<(usize, usize)> {
        let y = row as isize + dy * steps as isize;
        let x = column as isize + dx * steps as isize;
        if y < 0 || y >= HEIGHT as isize || x < 0 || x >= WIDTH as isize {
            return None;
        }
        Some((y as usize, x as usize))
    }

    fn window_filled(
        &self,
        (row, column, direction): (usize, usize, (isize, isize)),
        length: usize,
        cell: Cell,
    ) -> bool {
        (0..length).all(|step| match Self::offset(row, column, direction, step) {
            Some((y, x)) => self.cell(y, x) == cell,
            None => false,
        })
    }

    /// Draws the board to `out`, top row first, followed by the column numbers
    pub fn display<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                out.queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match self.cell(row, column) {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
            }
            out.queue(PrintStyledContent(style("\n")))?;
        }

        let columns: String = (0..WIDTH).map(|x| x.to_string()).collect();
        out.queue(PrintStyledContent(style(columns + "\n")))?;
        out.flush()?;
        Ok(())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                let symbol = match self.cell(row, column) {
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
