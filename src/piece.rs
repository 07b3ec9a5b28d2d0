use log::{debug, trace};

use crate::board::{Board, Cell};
use crate::error::GameError;

// ============================================================================
// Shapes
// ============================================================================

pub type Shape = &'static [&'static [Cell]];

const SQUARE: Shape = &[&[5, 5], &[5, 5]];
const STICK: Shape = &[&[2], &[2], &[2], &[2]];
const L_FORWARD: Shape = &[&[1, 0], &[1, 0], &[1, 1]];
const L_BACKWARD: Shape = &[&[0, 3], &[0, 3], &[3, 3]];
const S_FORWARD: Shape = &[&[4, 0], &[4, 4], &[0, 4]];
const S_BACKWARD: Shape = &[&[0, 6], &[6, 6], &[6, 0]];
const TEE: Shape = &[&[7, 7, 7], &[0, 7, 0]];

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    Square,
    Stick,
    LForward,
    LBackward,
    SForward,
    SBackward,
    Tee,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Square,
        PieceKind::Stick,
        PieceKind::LForward,
        PieceKind::LBackward,
        PieceKind::Tee,
        PieceKind::SForward,
        PieceKind::SBackward,
    ];

    /// Cell matrix of the shape, rows top to bottom. Filled cells hold the
    /// shape's colour index.
    pub fn shape(self) -> Shape {
        match self {
            PieceKind::Square => SQUARE,
            PieceKind::Stick => STICK,
            PieceKind::LForward => L_FORWARD,
            PieceKind::LBackward => L_BACKWARD,
            PieceKind::SForward => S_FORWARD,
            PieceKind::SBackward => S_BACKWARD,
            PieceKind::Tee => TEE,
        }
    }

    pub fn width(self) -> usize {
        self.shape()[0].len()
    }

    pub fn height(self) -> usize {
        self.shape().len()
    }

    pub fn color(self) -> Cell {
        match self {
            PieceKind::LForward => 1,
            PieceKind::Stick => 2,
            PieceKind::LBackward => 3,
            PieceKind::SForward => 4,
            PieceKind::Square => 5,
            PieceKind::SBackward => 6,
            PieceKind::Tee => 7,
        }
    }

    /// Whether `rotate_right`/`rotate_left` are implemented for this shape.
    /// Only the square qualifies, since rotating it changes nothing.
    pub fn supports_rotation(self) -> bool {
        matches!(self, PieceKind::Square)
    }
}

/// Top-left corner of a piece's bounding box on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Location {
    pub x: i16,
    pub y: i16,
}

impl Location {
    /// Top-centre starting point for a piece `piece_width` cells wide.
    pub fn spawn(board_width: usize, piece_width: usize) -> Self {
        let centre = i16::try_from(board_width / 2).unwrap_or(i16::MAX);
        let half = i16::try_from(piece_width.div_ceil(2)).unwrap_or(i16::MAX);
        Self {
            x: centre.saturating_sub(half).saturating_add(1),
            y: 0,
        }
    }
}

/// Result of pushing a piece one row down.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DropOutcome {
    Fell,
    Locked { lines_cleared: u32 },
}

impl DropOutcome {
    /// True once the piece has been written into the board.
    pub fn is_finished(self) -> bool {
        matches!(self, DropOutcome::Locked { .. })
    }
}

// ============================================================================
// Piece
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub location: Location,
}

impl Piece {
    pub fn spawn(kind: PieceKind, board: &Board) -> Self {
        let location = Location::spawn(board.width(), kind.width());
        debug!("spawned {:?} at ({}, {})", kind, location.x, location.y);
        Self { kind, location }
    }

    pub fn new_at(kind: PieceKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            location: Location { x, y },
        }
    }

    pub fn width(&self) -> usize {
        self.kind.width()
    }

    pub fn height(&self) -> usize {
        self.kind.height()
    }

    pub fn color(&self) -> Cell {
        self.kind.color()
    }

    /// Board coordinates and colour of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (Location, Cell)> {
        let origin = self.location;
        self.kind
            .shape()
            .iter()
            .enumerate()
            .flat_map(move |(row, cols)| {
                cols.iter().enumerate().filter_map(move |(col, &cell)| {
                    (cell != 0).then_some((
                        Location {
                            x: origin.x.saturating_add(col as i16),
                            y: origin.y.saturating_add(row as i16),
                        },
                        cell,
                    ))
                })
            })
    }

    /// Same piece shifted by `(dx, dy)`; the board is not consulted.
    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            kind: self.kind,
            location: Location {
                x: self.location.x.saturating_add(dx),
                y: self.location.y.saturating_add(dy),
            },
        }
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.shift(board, -1)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.shift(board, 1)
    }

    fn shift(&mut self, board: &Board, dx: i16) -> bool {
        let candidate = self.moved(dx, 0);
        if board.check_collision(&candidate) {
            trace!("rejected sideways move of {:?} to x={}", self.kind, candidate.location.x);
            return false;
        }
        self.location = candidate.location;
        true
    }

    /// Moves the piece one row down, or locks it into `board` when the row
    /// below is blocked.
    pub fn drop(&mut self, board: &mut Board) -> DropOutcome {
        let candidate = self.moved(0, 1);
        if !board.check_collision(&candidate) {
            self.location = candidate.location;
            return DropOutcome::Fell;
        }

        let lines_cleared = board.commit(self);
        debug!(
            "locked {:?} at ({}, {}), {} line(s) cleared",
            self.kind, self.location.x, self.location.y, lines_cleared
        );
        DropOutcome::Locked { lines_cleared }
    }

    // TODO: rotation matrices for the six asymmetric shapes, checked against
    // the board like sideways moves.
    pub fn rotate_right(&mut self) -> Result<(), GameError> {
        self.rotate()
    }

    pub fn rotate_left(&mut self) -> Result<(), GameError> {
        self.rotate()
    }

    fn rotate(&self) -> Result<(), GameError> {
        if self.kind.supports_rotation() {
            Ok(())
        } else {
            Err(GameError::RotationUnsupported(self.kind))
        }
    }
}
