use crate::deck::{canonical_index, DECK_SIZE};
use crate::rules::{can_place_on_foundation, can_place_on_tableau};
use crate::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FOUNDATION_PILES: usize = 4;
pub const TABLEAU_PILES: usize = 7;
pub const CARDS_PER_SUIT: usize = 13;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    New,
    Playing,
    Won,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PileKind {
    Stock,
    Waste,
    Foundation,
    Tableau,
}

impl PileKind {
    pub const fn pile_count(self) -> usize {
        match self {
            PileKind::Stock | PileKind::Waste => 1,
            PileKind::Foundation => FOUNDATION_PILES,
            PileKind::Tableau => TABLEAU_PILES,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PileRef {
    pub kind: PileKind,
    pub index: usize,
}

impl PileRef {
    pub const STOCK: PileRef = PileRef {
        kind: PileKind::Stock,
        index: 0,
    };
    pub const WASTE: PileRef = PileRef {
        kind: PileKind::Waste,
        index: 0,
    };

    pub const fn foundation(index: usize) -> Self {
        Self {
            kind: PileKind::Foundation,
            index,
        }
    }

    pub const fn tableau(index: usize) -> Self {
        Self {
            kind: PileKind::Tableau,
            index,
        }
    }
}

impl fmt::Display for PileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PileKind::Stock => write!(f, "stock"),
            PileKind::Waste => write!(f, "waste"),
            PileKind::Foundation => write!(f, "f{}", self.index),
            PileKind::Tableau => write!(f, "t{}", self.index),
        }
    }
}

/// The four pile collections. Every pile's top is its last element.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub stock: Vec<Card>,
    pub waste: Vec<Card>,
    pub foundations: [Vec<Card>; FOUNDATION_PILES],
    pub tableau: [Vec<Card>; TABLEAU_PILES],
}

impl Board {
    pub fn pile(&self, pile: PileRef) -> Option<&[Card]> {
        match pile.kind {
            PileKind::Stock if pile.index == 0 => Some(&self.stock),
            PileKind::Waste if pile.index == 0 => Some(&self.waste),
            PileKind::Foundation => self.foundations.get(pile.index).map(Vec::as_slice),
            PileKind::Tableau => self.tableau.get(pile.index).map(Vec::as_slice),
            _ => None,
        }
    }

    pub(crate) fn pile_mut(&mut self, pile: PileRef) -> Option<&mut Vec<Card>> {
        match pile.kind {
            PileKind::Stock if pile.index == 0 => Some(&mut self.stock),
            PileKind::Waste if pile.index == 0 => Some(&mut self.waste),
            PileKind::Foundation => self.foundations.get_mut(pile.index),
            PileKind::Tableau => self.tableau.get_mut(pile.index),
            _ => None,
        }
    }

    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.waste.len()
            + self.foundations.iter().map(Vec::len).sum::<usize>()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
    }

    pub fn all_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.stock
            .iter()
            .chain(self.waste.iter())
            .chain(self.foundations.iter().flatten())
            .chain(self.tableau.iter().flatten())
    }

    pub fn foundations_complete(&self) -> bool {
        self.foundations
            .iter()
            .all(|pile| pile.len() == CARDS_PER_SUIT)
    }

    /// Verifies the structural invariants of an in-play board: exactly one
    /// full deck, well-formed foundations, and tableau piles whose face-up
    /// suffix is a descending alternating run ending in a face-up tail.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.card_count() != DECK_SIZE {
            return Err(format!(
                "board holds {} cards, expected {DECK_SIZE}",
                self.card_count()
            ));
        }
        let mut seen = [false; DECK_SIZE];
        for card in self.all_cards() {
            let idx = canonical_index(card);
            if seen[idx] {
                return Err(format!("duplicate card {card}"));
            }
            seen[idx] = true;
        }
        if let Some(card) = self.stock.iter().find(|card| card.face_up) {
            return Err(format!("stock card {card} is face up"));
        }
        if let Some(card) = self.waste.iter().find(|card| !card.face_up) {
            return Err(format!("waste card {card} is face down"));
        }
        for (idx, pile) in self.foundations.iter().enumerate() {
            let mut top: Option<&Card> = None;
            for card in pile {
                if !card.face_up || !can_place_on_foundation(card, top) {
                    return Err(format!("foundation {idx} is out of sequence at {card}"));
                }
                top = Some(card);
            }
        }
        for (idx, pile) in self.tableau.iter().enumerate() {
            let Some(tail) = pile.last() else {
                continue;
            };
            if !tail.face_up {
                return Err(format!("tableau {idx} tail {tail} is face down"));
            }
            let first_up = pile
                .iter()
                .position(|card| card.face_up)
                .unwrap_or(pile.len());
            let run = &pile[first_up..];
            if run.iter().any(|card| !card.face_up) {
                return Err(format!("tableau {idx} has a face-down card inside its run"));
            }
            for pair in run.windows(2) {
                if !can_place_on_tableau(&pair[1], Some(&pair[0])) {
                    return Err(format!(
                        "tableau {idx} run breaks between {} and {}",
                        pair[0], pair[1]
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deal, shuffled_deck, Rank, Suit};

    #[test]
    fn pile_lookup_respects_bounds() {
        let board = Board::default();
        assert!(board.pile(PileRef::STOCK).is_some());
        assert!(board.pile(PileRef::foundation(3)).is_some());
        assert!(board.pile(PileRef::foundation(4)).is_none());
        assert!(board.pile(PileRef::tableau(7)).is_none());
        assert!(board
            .pile(PileRef {
                kind: PileKind::Waste,
                index: 1
            })
            .is_none());
    }

    #[test]
    fn fresh_deal_satisfies_invariants() {
        let board = deal(shuffled_deck(5)).expect("deal");
        assert_eq!(board.check_invariants(), Ok(()));
    }

    #[test]
    fn duplicate_card_is_reported() {
        let mut board = deal(shuffled_deck(5)).expect("deal");
        let copy = board.stock[0];
        board.stock[1] = copy;
        let err = board.check_invariants().expect_err("duplicate");
        assert!(err.contains("duplicate"), "{err}");
    }

    #[test]
    fn face_down_tableau_tail_is_reported() {
        let mut board = deal(shuffled_deck(5)).expect("deal");
        if let Some(card) = board.tableau[2].last_mut() {
            card.face_up = false;
        }
        assert!(board.check_invariants().is_err());
    }

    #[test]
    fn foundation_out_of_order_is_reported() {
        let mut board = deal(shuffled_deck(8)).expect("deal");
        let mut taken = Vec::new();
        for pile in &mut board.tableau {
            taken.append(pile);
        }
        taken.append(&mut board.stock);
        let two = taken
            .iter()
            .position(|c| c.suit == Suit::Clubs && c.rank == Rank::Two)
            .expect("two of clubs");
        let mut card = taken.remove(two);
        card.face_up = true;
        board.foundations[0].push(card);
        for card in &mut taken {
            card.face_up = false;
        }
        board.stock = taken;
        let err = board.check_invariants().expect_err("bad foundation");
        assert!(err.contains("foundation 0"), "{err}");
    }

    #[test]
    fn pile_ref_display() {
        assert_eq!(PileRef::WASTE.to_string(), "waste");
        assert_eq!(PileRef::tableau(4).to_string(), "t4");
        assert_eq!(PileRef::foundation(0).to_string(), "f0");
    }
}
