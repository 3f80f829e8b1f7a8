use klondike_core::{
    build_deck, deal, Board, Card, Event, EventBus, Game, GameSnapshot, MoveOutcome, Phase,
    PileRef, Rank, Rejection, StockAction, Suit, DECK_SIZE,
};
use pretty_assertions::assert_eq;

fn playing_game(board: Board) -> Game {
    Game::from_snapshot(GameSnapshot {
        board,
        score: 0,
        phase: Phase::Playing,
        seed: None,
    })
    .expect("valid board")
}

fn position(deck: &[Card], suit: Suit, rank: Rank) -> usize {
    deck.iter()
        .position(|card| card.suit == suit && card.rank == rank)
        .expect("card in deck")
}

/// Canonical deck with the ace of hearts moved to the stock top.
fn ace_on_stock_top() -> Vec<Card> {
    let mut deck = build_deck();
    let ace = position(&deck, Suit::Hearts, Rank::Ace);
    deck.swap(ace, DECK_SIZE - 1);
    deck
}

#[test]
fn fresh_game_layout() {
    for seed in [0, 1, 42, 0xC0FFEE] {
        let mut events = EventBus::default();
        let mut game = Game::new(seed);
        game.new_game(&mut events).expect("deal");
        let board = game.board();
        assert_eq!(board.card_count(), DECK_SIZE);
        for (idx, pile) in board.tableau.iter().enumerate() {
            assert_eq!(pile.len(), idx + 1);
            assert_eq!(
                pile.iter().filter(|card| card.face_up).count(),
                1,
                "only the tail of tableau {idx} is face up"
            );
            assert!(pile.last().is_some_and(|card| card.face_up));
        }
        assert_eq!(board.stock.len(), 24);
        assert!(board.stock.iter().all(|card| !card.face_up));
        assert!(board.waste.is_empty());
        assert!(board.foundations.iter().all(Vec::is_empty));
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), Phase::Playing);
    }
}

#[test]
fn drawn_ace_goes_to_foundation_for_ten_points() {
    let board = deal(ace_on_stock_top()).expect("deal");
    let mut game = playing_game(board);
    let mut events = EventBus::default();

    let drawn = game.draw_stock(&mut events);
    assert_eq!(drawn, StockAction::Drawn(Card::face_up(Suit::Hearts, Rank::Ace)));
    let waste_before = game.board().waste.len();

    let card = *game.board().waste.last().expect("waste top");
    let grant = game
        .begin_drag(card, PileRef::WASTE, waste_before - 1)
        .expect("drag");
    assert!(grant.permitted);
    let outcome = game.drop(PileRef::foundation(2), &mut events).expect("drop");

    assert!(outcome.is_applied());
    assert_eq!(game.board().waste.len(), waste_before - 1);
    assert_eq!(game.board().foundations[2].last(), Some(&card));
    assert_eq!(game.score(), 10);
}

#[test]
fn black_eight_on_black_nine_changes_nothing() {
    let mut deck = build_deck();
    // Tableau 0 is dealt deck[0]; the stock top is deck[51].
    let nine = position(&deck, Suit::Spades, Rank::Nine);
    deck.swap(0, nine);
    let eight = position(&deck, Suit::Clubs, Rank::Eight);
    deck.swap(DECK_SIZE - 1, eight);
    let board = deal(deck).expect("deal");
    let mut game = playing_game(board);
    let mut events = EventBus::default();

    game.draw_stock(&mut events);
    let before = game.snapshot();
    let card = *game.board().waste.last().expect("waste top");
    assert_eq!((card.suit, card.rank), (Suit::Clubs, Rank::Eight));
    game.begin_drag(card, PileRef::WASTE, 0).expect("drag");
    let outcome = game.drop(PileRef::tableau(0), &mut events).expect("drop");

    assert_eq!(outcome, MoveOutcome::Rejected(Rejection::IllegalTarget));
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.score(), 0);
}

#[test]
fn double_click_and_drag_score_alike() {
    let mut by_drag = playing_game(deal(ace_on_stock_top()).expect("deal"));
    let mut by_click = by_drag.clone();
    let mut events = EventBus::default();

    by_drag.draw_stock(&mut events);
    let ace = *by_drag.board().waste.last().expect("ace");
    by_drag.begin_drag(ace, PileRef::WASTE, 0).expect("drag");
    by_drag.drop(PileRef::foundation(0), &mut events).expect("drop");

    by_click.draw_stock(&mut events);
    by_click
        .double_click(ace, PileRef::WASTE, 0, &mut events)
        .expect("double click");

    assert_eq!(by_drag.snapshot(), by_click.snapshot());
    assert_eq!(by_click.score(), 10);
}

#[test]
fn new_game_after_win_starts_over() {
    let mut board = Board::default();
    for (slot, suit) in Suit::ALL.into_iter().enumerate() {
        board.foundations[slot] = Rank::ALL
            .into_iter()
            .map(|rank| Card::face_up(suit, rank))
            .collect();
    }
    let mut game = playing_game(board);
    let mut events = EventBus::default();
    assert!(game.check_win(&mut events));
    assert_eq!(game.phase(), Phase::Won);

    let mut short = game.snapshot();
    short.phase = Phase::Playing;
    let king = short.board.foundations[1].pop().expect("king");
    short.board.waste.push(king);
    let mut unfinished = Game::from_snapshot(short).expect("valid");
    assert!(!unfinished.check_win(&mut events));
    assert_eq!(unfinished.phase(), Phase::Playing);

    game.new_game(&mut events).expect("new game");
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.score(), 0);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::Dealt { .. })));
}
