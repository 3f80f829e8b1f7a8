use crate::deck::{canonical_index, DECK_SIZE};
use crate::state::TABLEAU_PILES;
use crate::{Board, Card};
use thiserror::Error;

/// Cards needed to lay out the seven tableau piles (1 + 2 + ... + 7).
pub const TABLEAU_DEAL: usize = TABLEAU_PILES * (TABLEAU_PILES + 1) / 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealError {
    #[error("deck has {0} cards, expected 52")]
    WrongSize(usize),
    #[error("deck holds {0} more than once")]
    DuplicateCard(Card),
}

/// Lays a full deck out front to back: pile `i` takes the next `i + 1`
/// cards with only the last turned up, and the remainder becomes the stock.
pub fn deal(deck: Vec<Card>) -> Result<Board, DealError> {
    if deck.len() != DECK_SIZE {
        return Err(DealError::WrongSize(deck.len()));
    }
    let mut seen = [false; DECK_SIZE];
    for card in &deck {
        let idx = canonical_index(card);
        if seen[idx] {
            return Err(DealError::DuplicateCard(*card));
        }
        seen[idx] = true;
    }

    let mut board = Board::default();
    let mut cards = deck.into_iter();
    for (column, pile) in board.tableau.iter_mut().enumerate() {
        let count = column + 1;
        pile.extend(cards.by_ref().take(count).map(|mut card| {
            card.face_up = false;
            card
        }));
        if let Some(tail) = pile.last_mut() {
            tail.face_up = true;
        }
    }
    board.stock = cards
        .map(|mut card| {
            card.face_up = false;
            card
        })
        .collect();
    Ok(board)
}
