use super::*;
use crate::{deal, shuffled_deck, Event, EventBus};

impl Game {
    /// Discards the board and returns to `New`.
    pub fn reset(&mut self) {
        self.board = Board::default();
        self.phase = Phase::New;
        self.score = 0;
        self.drag = None;
    }

    /// Draws a fresh deal seed from the game generator and deals it.
    pub fn new_game(&mut self, events: &mut EventBus) -> Result<(), EngineError> {
        let seed = self.rng.next_u64();
        self.new_game_with_seed(seed, events)
    }

    pub fn new_game_with_seed(&mut self, seed: u64, events: &mut EventBus) -> Result<(), EngineError> {
        self.reset();
        self.board = deal(shuffled_deck(seed))?;
        self.deal_seed = Some(seed);
        self.phase = Phase::Playing;
        tracing::debug!(seed, "dealt new game");
        events.push(Event::Dealt { seed });
        Ok(())
    }

    /// Replays the current deal from scratch.
    pub fn deal_again(&mut self, events: &mut EventBus) -> Result<(), EngineError> {
        match self.deal_seed {
            Some(seed) => self.new_game_with_seed(seed, events),
            None => self.new_game(events),
        }
    }

    /// Turns the stock's top card onto the waste, or recycles the whole
    /// waste back into a face-down stock once the stock runs dry.
    pub fn draw_stock(&mut self, events: &mut EventBus) -> StockAction {
        if self.phase != Phase::Playing {
            return StockAction::NoOp;
        }
        if let Some(mut card) = self.board.stock.pop() {
            card.face_up = true;
            self.board.waste.push(card);
            tracing::debug!(%card, "drew from stock");
            events.push(Event::Drawn { card });
            return StockAction::Drawn(card);
        }
        if self.board.waste.is_empty() {
            return StockAction::NoOp;
        }
        let mut recycled = std::mem::take(&mut self.board.waste);
        recycled.reverse();
        for card in &mut recycled {
            card.face_up = false;
        }
        let count = recycled.len();
        self.board.stock = recycled;
        tracing::debug!(count, "recycled waste into stock");
        events.push(Event::Recycled { count });
        StockAction::Recycled(count)
    }

    /// True once every foundation holds a full suit; moves the game to `Won`.
    pub fn check_win(&mut self, events: &mut EventBus) -> bool {
        if !self.board.foundations_complete() {
            return false;
        }
        if self.phase != Phase::Won {
            self.phase = Phase::Won;
            self.drag = None;
            tracing::info!(score = self.score, "game won");
            events.push(Event::Won { score: self.score });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DECK_SIZE;
    use crate::{Rank, Suit};

    fn playing(seed: u64) -> (Game, EventBus) {
        let mut events = EventBus::default();
        let mut game = Game::new(seed);
        game.new_game(&mut events).expect("new game");
        (game, events)
    }

    #[test]
    fn starts_in_new_with_empty_piles() {
        let game = Game::new(1);
        assert_eq!(game.phase(), Phase::New);
        assert_eq!(game.board().card_count(), 0);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn new_game_deals_and_enters_playing() {
        let (game, mut events) = playing(9);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.board().card_count(), DECK_SIZE);
        assert_eq!(game.board().stock.len(), 24);
        let drained: Vec<_> = events.drain().collect();
        let seed = game.deal_seed().expect("seed recorded");
        assert_eq!(drained, vec![Event::Dealt { seed }]);
    }

    #[test]
    fn deal_again_reproduces_layout() {
        let (mut game, mut events) = playing(31);
        let before = game.board().clone();
        game.draw_stock(&mut events);
        game.deal_again(&mut events).expect("deal again");
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn successive_games_differ() {
        let (mut game, mut events) = playing(31);
        let first = game.deal_seed();
        game.new_game(&mut events).expect("second game");
        assert_ne!(game.deal_seed(), first);
    }

    #[test]
    fn draw_moves_tail_face_up() {
        let (mut game, mut events) = playing(4);
        let top = *game.board().stock.last().expect("stock");
        let action = game.draw_stock(&mut events);
        let mut expected = top;
        expected.face_up = true;
        assert_eq!(action, StockAction::Drawn(expected));
        assert_eq!(game.board().waste, vec![expected]);
        assert_eq!(game.board().stock.len(), 23);
    }

    #[test]
    fn draw_is_a_noop_before_dealing() {
        let mut game = Game::new(4);
        let mut events = EventBus::default();
        assert_eq!(game.draw_stock(&mut events), StockAction::NoOp);
        assert!(events.is_empty());
    }

    #[test]
    fn two_full_passes_restore_stock_order() {
        let (mut game, mut events) = playing(77);
        let original = game.board().stock.clone();
        for _ in 0..2 {
            for _ in 0..original.len() {
                assert!(matches!(game.draw_stock(&mut events), StockAction::Drawn(_)));
            }
            assert!(game.board().stock.is_empty());
            assert!(game.board().waste.iter().all(|card| card.face_up));
            assert_eq!(
                game.draw_stock(&mut events),
                StockAction::Recycled(original.len())
            );
            assert!(game.board().waste.is_empty());
            assert!(game.board().stock.iter().all(|card| !card.face_up));
        }
        assert_eq!(game.board().stock, original);
    }

    #[test]
    fn recycle_reverses_waste_face_down() {
        let (mut game, mut events) = playing(8);
        let mut rest = std::mem::take(&mut game.board.stock);
        let z = rest.pop().expect("z");
        let y = rest.pop().expect("y");
        let x = rest.pop().expect("x");
        // Tuck the rest of the stock under tableau 0 so the deck stays whole.
        game.board.tableau[0].splice(0..0, rest);
        game.board.waste = [x, y, z]
            .into_iter()
            .map(|mut card| {
                card.face_up = true;
                card
            })
            .collect();

        assert_eq!(game.draw_stock(&mut events), StockAction::Recycled(3));
        assert_eq!(game.board().stock, vec![z, y, x]);
        assert!(game.board().stock.iter().all(|card| !card.face_up));
        assert!(game.board().waste.is_empty());
    }

    #[test]
    fn draw_with_both_piles_empty_is_a_noop() {
        let (mut game, mut events) = playing(8);
        let stock = std::mem::take(&mut game.board.stock);
        game.board.tableau[0].splice(0..0, stock);
        let before = game.board().clone();
        assert_eq!(game.draw_stock(&mut events), StockAction::NoOp);
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn win_requires_every_foundation_full() {
        let (mut game, mut events) = playing(5);
        assert!(!game.check_win(&mut events));
        assert_eq!(game.phase(), Phase::Playing);

        let mut board = Board::default();
        for (slot, suit) in Suit::ALL.into_iter().enumerate() {
            board.foundations[slot] = Rank::ALL
                .into_iter()
                .map(|rank| Card::face_up(suit, rank))
                .collect();
        }
        game.board = board;
        assert!(game.check_win(&mut events));
        assert_eq!(game.phase(), Phase::Won);
        assert!(events
            .drain()
            .any(|event| matches!(event, Event::Won { .. })));
        assert_eq!(game.draw_stock(&mut events), StockAction::NoOp);
    }

    #[test]
    fn reset_returns_to_new() {
        let (mut game, _) = playing(5);
        game.reset();
        assert_eq!(game.phase(), Phase::New);
        assert_eq!(game.board().card_count(), 0);
    }
}
