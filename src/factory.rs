use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::piece::{Piece, PieceKind};

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_kind(&mut self) -> PieceKind;
}

/// Uniform, independent draws over all seven kinds. No bag, no repeat
/// avoidance.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())]
    }
}

/// Cycles through a fixed list of kinds.
pub struct SequencePieceProvider {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceProvider {
    /// # Panics
    /// If `kinds` is empty.
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        assert!(!kinds.is_empty(), "sequence provider needs at least one kind");
        Self { kinds, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind
    }
}

// ============================================================================
// Factory
// ============================================================================

pub struct PieceFactory {
    provider: Box<dyn PieceProvider>,
}

impl PieceFactory {
    pub fn new(provider: Box<dyn PieceProvider>) -> Self {
        Self { provider }
    }

    pub fn random() -> Self {
        Self::new(Box::new(RandomPieceProvider::new()))
    }

    /// A new piece of the provider's next kind at its spawn location.
    pub fn next(&mut self, board: &Board) -> Piece {
        Piece::spawn(self.provider.next_kind(), board)
    }
}
