//! Move legality. Every function here is a pure predicate over cards and
//! pile contents; the game state machine decides what to do with the answer.

use crate::state::FOUNDATION_PILES;
use crate::{Card, PileKind, Rank};

/// Points awarded for every card landing on a foundation.
pub const FOUNDATION_SCORE: u32 = 10;

pub fn can_place_on_foundation(card: &Card, top: Option<&Card>) -> bool {
    match top {
        Some(top) => card.suit == top.suit && card.rank.value() == top.rank.value() + 1,
        None => card.rank == Rank::Ace,
    }
}

/// Tableau adjacency is keyed on color, not on the exact suit.
pub fn can_place_on_tableau(card: &Card, top: Option<&Card>) -> bool {
    match top {
        Some(top) => card.color() != top.color() && card.rank.value() + 1 == top.rank.value(),
        None => card.rank == Rank::King,
    }
}

/// The cards that would move if `pile[card_index]` were picked up from a
/// pile of the given kind, or `None` if that position cannot be a source.
pub fn movable_unit(kind: PileKind, pile: &[Card], card_index: usize) -> Option<&[Card]> {
    match kind {
        PileKind::Stock => None,
        PileKind::Waste | PileKind::Foundation => {
            if card_index + 1 == pile.len() {
                pile.get(card_index..)
            } else {
                None
            }
        }
        PileKind::Tableau => {
            let unit = pile.get(card_index..)?;
            if unit.is_empty() || unit.iter().any(|card| !card.face_up) {
                return None;
            }
            Some(unit)
        }
    }
}

pub fn is_legal_move(unit: &[Card], target_kind: PileKind, target_pile: &[Card]) -> bool {
    let Some(head) = unit.first() else {
        return false;
    };
    match target_kind {
        PileKind::Foundation => unit.len() == 1 && can_place_on_foundation(head, target_pile.last()),
        PileKind::Tableau => can_place_on_tableau(head, target_pile.last()),
        PileKind::Stock | PileKind::Waste => false,
    }
}

/// First foundation, scanning slot 0 upward, that accepts `card`.
pub fn auto_play_target(card: &Card, foundations: &[Vec<Card>; FOUNDATION_PILES]) -> Option<usize> {
    foundations
        .iter()
        .position(|pile| can_place_on_foundation(card, pile.last()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn up(suit: Suit, rank: Rank) -> Card {
        Card::face_up(suit, rank)
    }

    #[test]
    fn foundation_grid_against_empty_and_every_top() {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let card = up(suit, rank);
                assert_eq!(
                    can_place_on_foundation(&card, None),
                    rank == Rank::Ace,
                    "{card} on empty foundation"
                );
                for top_suit in Suit::ALL {
                    for top_rank in Rank::ALL {
                        let top = up(top_suit, top_rank);
                        let expected =
                            top_suit == suit && top_rank.value() + 1 == rank.value();
                        assert_eq!(
                            can_place_on_foundation(&card, Some(&top)),
                            expected,
                            "{card} on {top}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn tableau_grid_against_empty_and_every_top() {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let card = up(suit, rank);
                assert_eq!(
                    can_place_on_tableau(&card, None),
                    rank == Rank::King,
                    "{card} on empty tableau"
                );
                for top_suit in Suit::ALL {
                    for top_rank in Rank::ALL {
                        let top = up(top_suit, top_rank);
                        let expected = top_suit.color() != suit.color()
                            && rank.value() + 1 == top_rank.value();
                        assert_eq!(
                            can_place_on_tableau(&card, Some(&top)),
                            expected,
                            "{card} on {top}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn movable_unit_waste_only_tail() {
        let waste = vec![up(Suit::Hearts, Rank::Two), up(Suit::Clubs, Rank::Five)];
        assert_eq!(movable_unit(PileKind::Waste, &waste, 1), Some(&waste[1..]));
        assert_eq!(movable_unit(PileKind::Waste, &waste, 0), None);
        assert_eq!(movable_unit(PileKind::Waste, &waste, 2), None);
        assert_eq!(movable_unit(PileKind::Waste, &[], 0), None);
    }

    #[test]
    fn movable_unit_never_from_stock() {
        let stock = vec![Card::new(Suit::Hearts, Rank::Two)];
        assert_eq!(movable_unit(PileKind::Stock, &stock, 0), None);
    }

    #[test]
    fn movable_unit_tableau_suffix_must_be_face_up() {
        let pile = vec![
            Card::new(Suit::Spades, Rank::Four),
            up(Suit::Spades, Rank::Nine),
            up(Suit::Hearts, Rank::Eight),
            up(Suit::Clubs, Rank::Seven),
        ];
        assert_eq!(movable_unit(PileKind::Tableau, &pile, 1), Some(&pile[1..]));
        assert_eq!(movable_unit(PileKind::Tableau, &pile, 3), Some(&pile[3..]));
        assert_eq!(movable_unit(PileKind::Tableau, &pile, 0), None);
        assert_eq!(movable_unit(PileKind::Tableau, &pile, 4), None);
    }

    #[test]
    fn runs_never_go_to_foundations() {
        let run = vec![up(Suit::Hearts, Rank::Two), up(Suit::Clubs, Rank::Ace)];
        let foundation = vec![up(Suit::Hearts, Rank::Ace)];
        assert!(!is_legal_move(&run, PileKind::Foundation, &foundation));
        assert!(is_legal_move(&run[..1], PileKind::Foundation, &foundation));
    }

    #[test]
    fn runs_move_between_tableau_piles_by_head() {
        let run = vec![up(Suit::Hearts, Rank::Eight), up(Suit::Clubs, Rank::Seven)];
        let target = vec![up(Suit::Spades, Rank::Nine)];
        assert!(is_legal_move(&run, PileKind::Tableau, &target));
        let same_color = vec![up(Suit::Diamonds, Rank::Nine)];
        assert!(!is_legal_move(&run, PileKind::Tableau, &same_color));
    }

    #[test]
    fn same_color_and_gaps_are_rejected() {
        let red_ten = up(Suit::Hearts, Rank::Ten);
        assert!(!can_place_on_tableau(&up(Suit::Diamonds, Rank::Nine), Some(&red_ten)));
        assert!(!can_place_on_tableau(&up(Suit::Spades, Rank::Eight), Some(&red_ten)));
        assert!(can_place_on_tableau(&up(Suit::Spades, Rank::Nine), Some(&red_ten)));
    }

    #[test]
    fn stock_and_waste_are_never_targets() {
        let unit = vec![up(Suit::Hearts, Rank::King)];
        assert!(!is_legal_move(&unit, PileKind::Stock, &[]));
        assert!(!is_legal_move(&unit, PileKind::Waste, &[]));
        assert!(!is_legal_move(&[], PileKind::Tableau, &[]));
    }

    #[test]
    fn auto_play_scans_slots_in_order() {
        let mut foundations: [Vec<Card>; FOUNDATION_PILES] = Default::default();
        let ace = up(Suit::Clubs, Rank::Ace);
        assert_eq!(auto_play_target(&ace, &foundations), Some(0));

        foundations[0].push(up(Suit::Hearts, Rank::Ace));
        foundations[2].push(up(Suit::Clubs, Rank::Ace));
        assert_eq!(auto_play_target(&ace, &foundations), Some(1));
        assert_eq!(
            auto_play_target(&up(Suit::Clubs, Rank::Two), &foundations),
            Some(2)
        );
        assert_eq!(
            auto_play_target(&up(Suit::Spades, Rank::Two), &foundations),
            None
        );
    }
}
