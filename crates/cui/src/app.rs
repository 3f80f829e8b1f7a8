use crate::celebration::Celebration;
use crate::persistence::{default_state_path, load_state_file, save_state_file};
use anyhow::{Context, Result};
use klondike_core::{
    Card, EngineError, Event, EventBus, Game, MoveOutcome, Phase, PileKind, PileRef, RngState,
    StockAction, FOUNDATION_PILES, TABLEAU_PILES,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

pub const TICK_RATE: Duration = Duration::from_millis(120);
const MAX_EVENT_LOG: usize = 200;

/// Left-to-right order the cursor walks through.
const PILE_ORDER: [PileRef; 13] = [
    PileRef::STOCK,
    PileRef::WASTE,
    PileRef::foundation(0),
    PileRef::foundation(1),
    PileRef::foundation(2),
    PileRef::foundation(3),
    PileRef::tableau(0),
    PileRef::tableau(1),
    PileRef::tableau(2),
    PileRef::tableau(3),
    PileRef::tableau(4),
    PileRef::tableau(5),
    PileRef::tableau(6),
];

pub struct App {
    pub game: Game,
    pub events: EventBus,
    pub cursor: PileRef,
    /// Card index inside the cursor's tableau column. Ignored elsewhere.
    pub row: usize,
    pub held: Vec<Card>,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub celebration: Option<Celebration>,
    pub save_path: Option<PathBuf>,
    pub should_quit: bool,
    arena: (u16, u16),
    fx_rng: RngState,
}

impl App {
    pub fn bootstrap(
        seed: Option<u64>,
        save_path: Option<PathBuf>,
        load_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut events = EventBus::default();
        let game = match load_path.as_ref() {
            Some(path) => load_state_file(path)
                .map_err(|err| anyhow::anyhow!(err))
                .with_context(|| format!("load saved game from {}", path.display()))?,
            None => {
                let mut game = match seed {
                    Some(seed) => Game::new(seed),
                    None => Game::from_entropy(),
                };
                game.new_game(&mut events).context("deal first game")?;
                game
            }
        };
        let fx_rng = match seed {
            Some(seed) => RngState::from_seed(seed.rotate_left(17)),
            None => RngState::from_entropy(),
        };
        let mut app = Self {
            game,
            events,
            cursor: PileRef::STOCK,
            row: 0,
            held: Vec::new(),
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            show_help: false,
            celebration: None,
            save_path: save_path.or_else(default_state_path),
            should_quit: false,
            arena: (80, 24),
            fx_rng,
        };
        if let Some(path) = load_path {
            app.push_event_line(format!("loaded {}", path.display()));
        }
        app.flush_events();
        Ok(app)
    }

    pub fn set_arena(&mut self, width: u16, height: u16) {
        self.arena = (width, height);
        if let Some(celebration) = self.celebration.as_mut() {
            celebration.resize(width, height);
        }
    }

    pub fn on_tick(&mut self, width: u16, height: u16) {
        self.set_arena(width, height);
        let finished = match self.celebration.as_mut() {
            Some(celebration) => {
                celebration.tick(TICK_RATE);
                celebration.is_finished()
            }
            None => false,
        };
        if finished {
            self.finish_celebration();
        }
    }

    pub fn finish_celebration(&mut self) {
        self.celebration = None;
        self.new_game();
    }

    pub fn cycle_pile(&mut self, forward: bool) {
        let pos = PILE_ORDER
            .iter()
            .position(|pile| *pile == self.cursor)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % PILE_ORDER.len()
        } else {
            (pos + PILE_ORDER.len() - 1) % PILE_ORDER.len()
        };
        self.jump_to(PILE_ORDER[next]);
    }

    pub fn jump_to(&mut self, pile: PileRef) {
        self.cursor = pile;
        self.row = self.pile_len(pile).saturating_sub(1);
    }

    /// Walks the face-up run of a tableau column; past either end it hops
    /// between the top row and the column under it.
    pub fn move_row(&mut self, down: bool) {
        match self.cursor.kind {
            PileKind::Tableau => {
                let cards = self.cursor_pile();
                let first_up = cards.iter().position(|card| card.face_up);
                if down {
                    if self.row + 1 < cards.len() {
                        self.row += 1;
                    }
                } else {
                    match first_up {
                        Some(first) if self.row > first => self.row -= 1,
                        _ => self.jump_to(top_row_above(self.cursor.index)),
                    }
                }
            }
            _ if down => self.jump_to(PileRef::tableau(column_of(self.cursor))),
            _ => {}
        }
    }

    pub fn cursor_pile(&self) -> &[Card] {
        self.game.board().pile(self.cursor).unwrap_or(&[])
    }

    /// Card under the cursor with its index: the selected row in a tableau
    /// column, the top card anywhere else.
    pub fn cursor_card(&self) -> Option<(Card, usize)> {
        let cards = self.cursor_pile();
        let index = match self.cursor.kind {
            PileKind::Tableau => self.row.min(cards.len().checked_sub(1)?),
            _ => cards.len().checked_sub(1)?,
        };
        cards.get(index).map(|card| (*card, index))
    }

    pub fn grab_or_drop(&mut self) {
        if self.game.pending_drag().is_some() {
            let result = self.game.drop(self.cursor, &mut self.events);
            self.held.clear();
            self.report_move(result);
            return;
        }
        if self.cursor == PileRef::STOCK {
            self.draw_stock();
            return;
        }
        let Some((card, index)) = self.cursor_card() else {
            self.push_status(format!("{} is empty", self.cursor));
            return;
        };
        match self.game.begin_drag(card, self.cursor, index) {
            Ok(grant) if grant.permitted => {
                self.push_status(format!("holding {}", join_cards(&grant.unit)));
                self.held = grant.unit;
            }
            Ok(_) => self.push_status(format!("cannot pick up {}", card_label(&card))),
            Err(err) => self.push_error(err),
        }
    }

    pub fn auto_play(&mut self) {
        if self.cursor == PileRef::STOCK {
            self.draw_stock();
            return;
        }
        let Some((card, index)) = self.cursor_card() else {
            self.push_status(format!("{} is empty", self.cursor));
            return;
        };
        self.game.cancel_drag();
        self.held.clear();
        let result = self.game.double_click(card, self.cursor, index, &mut self.events);
        self.report_move(result);
    }

    pub fn cancel_drag(&mut self) {
        if self.game.pending_drag().is_some() {
            self.game.cancel_drag();
            self.held.clear();
            self.push_status("drag cancelled");
        }
    }

    pub fn draw_stock(&mut self) {
        match self.game.draw_stock(&mut self.events) {
            StockAction::Drawn(card) => self.push_status(format!("drew {card}")),
            StockAction::Recycled(count) => {
                self.push_status(format!("turned {count} cards back into the stock"))
            }
            StockAction::NoOp if self.game.phase() != Phase::Playing => {
                self.push_status("press n to deal")
            }
            StockAction::NoOp => self.push_status("stock and waste are empty"),
        }
        self.flush_events();
    }

    pub fn new_game(&mut self) {
        match self.game.new_game(&mut self.events) {
            Ok(()) => self.push_status("new deal"),
            Err(err) => self.push_error(err),
        }
        self.after_deal();
    }

    pub fn deal_again(&mut self) {
        match self.game.deal_again(&mut self.events) {
            Ok(()) => self.push_status("same deal again"),
            Err(err) => self.push_error(err),
        }
        self.after_deal();
    }

    pub fn save(&mut self) {
        let Some(path) = self.save_path.clone() else {
            self.push_status("save failed: no save path (set KLONDIKE_SAVE or HOME)");
            return;
        };
        match save_state_file(&self.game, &path) {
            Ok(()) => self.push_status(format!("saved to {}", path.display())),
            Err(err) => self.push_status(format!("save failed: {err}")),
        }
    }

    pub fn load(&mut self) {
        let Some(path) = self.save_path.clone() else {
            self.push_status("load failed: no save path (set KLONDIKE_SAVE or HOME)");
            return;
        };
        match load_state_file(&path) {
            Ok(game) => {
                self.game = game;
                self.held.clear();
                self.celebration = None;
                self.jump_to(PileRef::STOCK);
                self.push_status(format!("loaded {}", path.display()));
            }
            Err(err) => self.push_status(format!("load failed: {err}")),
        }
    }

    pub fn seed_label(&self) -> String {
        self.game
            .deal_seed()
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn phase_label(&self) -> &'static str {
        match self.game.phase() {
            Phase::New => "new",
            Phase::Playing => "playing",
            Phase::Won => "won",
        }
    }

    /// True when `index` of `pile` belongs to the cards currently held.
    pub fn is_held(&self, pile: PileRef, index: usize) -> bool {
        self.game
            .pending_drag()
            .is_some_and(|drag| drag.source.pile == pile && index >= drag.source.card_index)
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    pub fn push_error(&mut self, err: EngineError) {
        tracing::warn!(%err, "engine refused command");
        self.status_line = format!("error: {err}");
    }

    fn report_move(&mut self, result: Result<MoveOutcome, EngineError>) {
        match result {
            Ok(MoveOutcome::Applied(report)) => {
                let mut line = format!(
                    "moved {} card(s) {} -> {}",
                    report.cards, report.from, report.to
                );
                if report.score_delta > 0 {
                    line.push_str(&format!(" (+{})", report.score_delta));
                }
                self.push_status(line);
            }
            Ok(MoveOutcome::Rejected(reason)) => self.push_status(reason.label()),
            Err(err) => self.push_error(err),
        }
        let len = self.pile_len(self.cursor);
        self.row = self.row.min(len.saturating_sub(1));
        self.flush_events();
    }

    fn after_deal(&mut self) {
        self.held.clear();
        self.jump_to(PileRef::STOCK);
        self.flush_events();
    }

    fn pile_len(&self, pile: PileRef) -> usize {
        self.game.board().pile(pile).map_or(0, <[Card]>::len)
    }

    fn flush_events(&mut self) {
        let drained: Vec<_> = self.events.drain().collect();
        for event in drained {
            if matches!(event, Event::Won { .. }) {
                let (width, height) = self.arena;
                self.celebration = Some(Celebration::new(width, height, &mut self.fx_rng));
            }
            self.push_event_line(format_event(&event));
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

/// Screen column of a pile. The top row sits stock, waste, gap, then the
/// four foundations, so each top pile lines up with a tableau column.
fn column_of(pile: PileRef) -> usize {
    match pile.kind {
        PileKind::Stock => 0,
        PileKind::Waste => 1,
        PileKind::Foundation => TABLEAU_PILES - FOUNDATION_PILES + pile.index,
        PileKind::Tableau => pile.index,
    }
}

fn top_row_above(column: usize) -> PileRef {
    match column {
        0 => PileRef::STOCK,
        1 | 2 => PileRef::WASTE,
        n => PileRef::foundation(n - (TABLEAU_PILES - FOUNDATION_PILES)),
    }
}

pub fn card_label(card: &Card) -> String {
    if card.face_up {
        card.to_string()
    } else {
        "##".to_string()
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards.iter().map(card_label).collect::<Vec<_>>().join(" ")
}

fn format_event(event: &Event) -> String {
    match event {
        Event::Dealt { seed } => format!("dealt seed {seed}"),
        Event::Drawn { card } => format!("drew {card}"),
        Event::Recycled { count } => format!("recycled {count} cards"),
        Event::Moved {
            from,
            to,
            cards,
            score_delta,
        } => {
            let mut line = format!("moved {} {from} -> {to}", join_cards(cards));
            if *score_delta > 0 {
                line.push_str(&format!(" +{score_delta}"));
            }
            line
        }
        Event::Flipped { pile, card } => format!("flipped {card} on {pile}"),
        Event::Rejected { reason } => format!("rejected: {}", reason.label()),
        Event::Won { score } => format!("won with {score} points"),
    }
}
