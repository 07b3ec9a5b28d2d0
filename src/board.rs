use std::str::FromStr;

use log::info;
use serde::Deserialize;

use crate::error::GameError;
use crate::piece::{Location, Piece};

// ============================================================================
// Configuration
// ============================================================================

pub type Cell = u8;

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 21;

/// Smallest board every piece variant fits on (the tee is 3 wide, the stick
/// 4 tall).
pub const MIN_WIDTH: usize = 3;
pub const MIN_HEIGHT: usize = 4;

/// Largest board accepted. Piece coordinates are `i16`, so this leaves room
/// for pieces hanging past any edge.
pub const MAX_WIDTH: usize = 255;
pub const MAX_HEIGHT: usize = 255;

/// Value written for every locked cell in [`LockColors::Marker`] mode.
pub const LOCK_MARKER: Cell = 8;

/// What `commit` writes into the board for a locked piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockColors {
    /// Every locked cell becomes [`LOCK_MARKER`].
    #[default]
    Marker,
    /// Locked cells keep the piece's own colour index.
    Preserve,
}

impl FromStr for LockColors {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marker" => Ok(LockColors::Marker),
            "preserve" => Ok(LockColors::Preserve),
            other => Err(other.to_string()),
        }
    }
}

pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), GameError> {
    if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) || !(MIN_HEIGHT..=MAX_HEIGHT).contains(&height) {
        return Err(GameError::InvalidDimensions { width, height });
    }
    Ok(())
}

// ============================================================================
// Board
// ============================================================================

/// Locked cells of a game. The dimensions are fixed at construction and only
/// `commit` and `clear_lines` write cells.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
    lock_colors: LockColors,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![vec![0; width]; height],
            lock_colors: LockColors::default(),
        })
    }

    /// Builds a board from existing rows, e.g. a saved position.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GameError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        check_dimensions(width, height)?;
        if rows.iter().any(|row| row.len() != width) {
            return Err(GameError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: rows,
            lock_colors: LockColors::default(),
        })
    }

    pub fn with_lock_colors(mut self, lock_colors: LockColors) -> Self {
        self.lock_colors = lock_colors;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn lock_colors(&self) -> LockColors {
        self.lock_colors
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Cell at column `x`, row `y`; `None` outside the board.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Empties every cell, keeping dimensions and lock mode.
    pub fn reset(&mut self) {
        for row in &mut self.cells {
            row.fill(0);
        }
    }

    fn index(&self, at: Location) -> Option<(usize, usize)> {
        let x = usize::try_from(at.x).ok()?;
        let y = usize::try_from(at.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// True when any filled cell of `piece` is off the board (on any side) or
    /// lands on a locked cell.
    pub fn check_collision(&self, piece: &Piece) -> bool {
        piece.cells().any(|(at, _)| match self.index(at) {
            Some((x, y)) => self.cells[y][x] != 0,
            None => true,
        })
    }

    /// Writes `piece` into the board and clears completed rows. Returns the
    /// number of rows cleared.
    pub fn commit(&mut self, piece: &Piece) -> u32 {
        for (at, color) in piece.cells() {
            if let Some((x, y)) = self.index(at) {
                self.cells[y][x] = match self.lock_colors {
                    LockColors::Marker => LOCK_MARKER,
                    LockColors::Preserve => color,
                };
            }
        }
        self.clear_lines()
    }

    /// Removes every complete row, scanning bottom to top, and inserts an
    /// empty row at the top for each one removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height;

        while y > 0 {
            if self.is_row_complete(y - 1) {
                self.cells.remove(y - 1);
                self.cells.insert(0, vec![0; self.width]);
                cleared += 1;
                // Re-check the same index: the row above has shifted into it
            } else {
                y -= 1;
            }
        }

        if cleared > 0 {
            info!("cleared {} line(s)", cleared);
        }
        cleared
    }

    /// Board cells with `piece` drawn on top in its own colour.
    pub fn overlay(&self, piece: &Piece) -> Vec<Vec<Cell>> {
        let mut merged = self.cells.clone();
        for (at, color) in piece.cells() {
            if let Some((x, y)) = self.index(at) {
                merged[y][x] = color;
            }
        }
        merged
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.cells[y].iter().all(|&cell| cell != 0)
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.cells[y].iter().filter(|&&cell| cell != 0).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell != 0).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cells: vec![vec![0; DEFAULT_WIDTH]; DEFAULT_HEIGHT],
            lock_colors: LockColors::default(),
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn empty_board() -> Board {
        Board::default()
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        board.cells[y].fill(LOCK_MARKER);
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..board.width {
            if x != gap_x {
                board.cells[y][x] = LOCK_MARKER;
            }
        }
    }

    pub fn set_cell(board: &mut Board, x: usize, y: usize, value: Cell) {
        board.cells[y][x] = value;
    }
}
