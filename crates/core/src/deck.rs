use crate::{Card, Rank, RngState, Suit};

pub const DECK_SIZE: usize = 52;

/// All 52 cards face down, suit-major and rank-minor.
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::new(suit, rank));
        }
    }
    deck
}

/// Returns a uniformly random permutation of `deck`. Nothing outside the
/// returned sequence is touched besides the generator itself.
pub fn shuffle(mut deck: Vec<Card>, rng: &mut RngState) -> Vec<Card> {
    rng.shuffle(&mut deck);
    deck
}

pub fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut rng = RngState::from_seed(seed);
    shuffle(build_deck(), &mut rng)
}

/// Index of a card within the canonical order, `0..52`.
pub fn canonical_index(card: &Card) -> usize {
    let suit = Suit::ALL
        .iter()
        .position(|suit| *suit == card.suit)
        .unwrap_or_default();
    suit * Rank::ALL.len() + usize::from(card.rank.value() - 1)
}
