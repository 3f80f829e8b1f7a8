use crate::{Board, Card, DealError, Phase, PileRef, Rejection, RngState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod drag;
mod lifecycle;
mod moves;
mod snapshot;

pub use snapshot::GameSnapshot;

/// Contract violations. These point at a bug in the caller's bookkeeping,
/// never at an illegal move; illegal moves come back as
/// [`MoveOutcome::Rejected`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no such pile: {0}")]
    PileOutOfRange(PileRef),
    #[error("pile {pile} has no card at index {index}")]
    CardOutOfRange { pile: PileRef, index: usize },
    #[error("expected {expected} at {pile}[{index}], found {found}")]
    CardMismatch {
        pile: PileRef,
        index: usize,
        expected: Card,
        found: Card,
    },
    #[error("invalid board: {0}")]
    InvalidBoard(String),
    #[error("deal failed: {0}")]
    Deal(#[from] DealError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveSource {
    pub pile: PileRef,
    pub card_index: usize,
}

impl MoveSource {
    pub const fn new(pile: PileRef, card_index: usize) -> Self {
        Self { pile, card_index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    Drawn(Card),
    Recycled(usize),
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub from: PileRef,
    pub to: PileRef,
    pub cards: usize,
    pub score_delta: u32,
    pub flipped: Option<Card>,
    pub won: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(MoveReport),
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }
}

/// Result of picking cards up. `unit` is what would travel with the cursor;
/// it is empty when the drag is not permitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGrant {
    pub unit: Vec<Card>,
    pub permitted: bool,
}

impl DragGrant {
    fn denied() -> Self {
        Self {
            unit: Vec::new(),
            permitted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDrag {
    pub card: Card,
    pub source: MoveSource,
}

/// Single owner of one game's mutable state. All commands run to completion
/// and either fully apply or leave the board untouched.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    phase: Phase,
    score: u32,
    rng: RngState,
    deal_seed: Option<u64>,
    drag: Option<PendingDrag>,
}

impl Game {
    /// An undealt game whose deals are drawn from `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(RngState::from_seed(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(RngState::from_entropy())
    }

    fn with_rng(rng: RngState) -> Self {
        Self {
            board: Board::default(),
            phase: Phase::New,
            score: 0,
            rng,
            deal_seed: None,
            drag: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seed of the most recent deal; replaying it reproduces the layout.
    pub fn deal_seed(&self) -> Option<u64> {
        self.deal_seed
    }

    pub fn pending_drag(&self) -> Option<&PendingDrag> {
        self.drag.as_ref()
    }

    /// Resolves a caller-supplied position, checking bounds and that the
    /// caller's view of the card matches the board.
    fn card_at(&self, pile: PileRef, index: usize, expected: &Card) -> Result<Card, EngineError> {
        let cards = self
            .board
            .pile(pile)
            .ok_or(EngineError::PileOutOfRange(pile))?;
        let found = *cards
            .get(index)
            .ok_or(EngineError::CardOutOfRange { pile, index })?;
        if !found.same_identity(expected) {
            return Err(EngineError::CardMismatch {
                pile,
                index,
                expected: *expected,
                found,
            });
        }
        Ok(found)
    }
}
