//! Falling-block puzzle simulation.
//!
//! The crate is split the way the game is played: a [`board::Board`] holds
//! locked cells, a [`piece::Piece`] is the shape currently falling, a
//! [`factory::PieceFactory`] picks the next shape and [`game::Game`] drives
//! all three from discrete input intents.

pub mod board;
pub mod config;
pub mod error;
pub mod factory;
pub mod game;
pub mod piece;

pub use board::{Board, Cell, LockColors, DEFAULT_HEIGHT, DEFAULT_WIDTH, LOCK_MARKER};
pub use config::GameConfig;
pub use error::GameError;
pub use factory::{PieceFactory, PieceProvider, RandomPieceProvider, SequencePieceProvider};
pub use game::{Game, GameEvent, GameState, Intent};
pub use piece::{DropOutcome, Location, Piece, PieceKind};
