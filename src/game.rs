use log::info;

use crate::board::{Board, Cell};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::factory::{PieceFactory, PieceProvider, RandomPieceProvider};
use crate::piece::{DropOutcome, Piece};

// ============================================================================
// Types
// ============================================================================

/// Logical inputs the front-end forwards to the simulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceLocked,
    LinesCleared(u32),
    GameRestarted,
    GameOver,
}

// ============================================================================
// Game
// ============================================================================

/// One session: a board, the falling piece and the factory producing the
/// next one. Pieces only fall on [`Intent::SoftDrop`]; there is no timer.
pub struct Game {
    pub board: Board,
    pub current_piece: Piece,
    pub state: GameState,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
    factory: PieceFactory,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Board::default(), Box::new(RandomPieceProvider::new()))
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let board = Board::new(config.width, config.height)?.with_lock_colors(config.lock_colors);
        let provider: Box<dyn PieceProvider> = match config.seed {
            Some(seed) => Box::new(RandomPieceProvider::seeded(seed)),
            None => Box::new(RandomPieceProvider::new()),
        };
        Ok(Self::with_provider(board, provider))
    }

    pub fn with_provider(board: Board, provider: Box<dyn PieceProvider>) -> Self {
        let mut factory = PieceFactory::new(provider);
        let current_piece = factory.next(&board);
        let mut game = Self {
            board,
            current_piece,
            state: GameState::Playing,
            lines_cleared: 0,
            pieces_locked: 0,
            factory,
            events: Vec::new(),
        };
        game.check_top_out();
        game
    }

    /// Starts from an arbitrary position; later pieces are random.
    pub fn with_board(board: Board, current_piece: Piece) -> Self {
        let mut game = Self {
            board,
            current_piece,
            state: GameState::Playing,
            lines_cleared: 0,
            pieces_locked: 0,
            factory: PieceFactory::random(),
            events: Vec::new(),
        };
        game.check_top_out();
        game
    }

    /// Forwards `intent` to the current piece. Returns whether anything
    /// changed; always false once the game is over.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::MoveLeft => self.move_left(),
            Intent::MoveRight => self.move_right(),
            Intent::SoftDrop => {
                if self.state != GameState::Playing {
                    return false;
                }
                self.soft_drop();
                true
            }
        }
    }

    pub fn move_left(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let moved = self.current_piece.move_left(&self.board);
        if moved {
            self.events.push(GameEvent::PieceMoved);
        }
        moved
    }

    pub fn move_right(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let moved = self.current_piece.move_right(&self.board);
        if moved {
            self.events.push(GameEvent::PieceMoved);
        }
        moved
    }

    /// Drops the piece one row. Returns true when it locked and a new piece
    /// was spawned.
    pub fn soft_drop(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        match self.current_piece.drop(&mut self.board) {
            DropOutcome::Fell => {
                self.events.push(GameEvent::PieceMoved);
                false
            }
            DropOutcome::Locked { lines_cleared } => {
                self.pieces_locked += 1;
                self.events.push(GameEvent::PieceLocked);
                if lines_cleared > 0 {
                    self.lines_cleared += lines_cleared;
                    self.events.push(GameEvent::LinesCleared(lines_cleared));
                }
                self.spawn_next_piece();
                true
            }
        }
    }

    pub fn rotate_right(&mut self) -> Result<(), GameError> {
        self.current_piece.rotate_right()
    }

    pub fn rotate_left(&mut self) -> Result<(), GameError> {
        self.current_piece.rotate_left()
    }

    pub fn spawn_next_piece(&mut self) {
        self.current_piece = self.factory.next(&self.board);
        self.check_top_out();
    }

    fn check_top_out(&mut self) {
        if self.board.check_collision(&self.current_piece) {
            info!(
                "{:?} cannot spawn, game over after {} piece(s) and {} line(s)",
                self.current_piece.kind, self.pieces_locked, self.lines_cleared
            );
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }

    pub fn restart(&mut self) {
        self.board.reset();
        self.lines_cleared = 0;
        self.pieces_locked = 0;
        self.state = GameState::Playing;
        self.events.clear();
        self.current_piece = self.factory.next(&self.board);
        self.events.push(GameEvent::GameRestarted);
        info!("restarted on a {}x{} board", self.board.width(), self.board.height());
    }

    /// Board cells with the falling piece overlaid, `height` rows of
    /// `width` cells.
    pub fn render_grid(&self) -> Vec<Vec<Cell>> {
        self.board.overlay(&self.current_piece)
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
