use anyhow::{Context, Result};
use klondike_cui::persistence::{default_state_path, load_state_file, save_state_file};
use klondike_core::{
    Board, Card, EngineError, Event, EventBus, Game, MoveOutcome, Phase, PileKind, PileRef, Rank,
    StockAction, Suit,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CliOptions {
    cui: bool,
    seed: Option<u64>,
    save_path: Option<PathBuf>,
    load_path: Option<PathBuf>,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut cui = false;
    let mut seed = std::env::var("KLONDIKE_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok());
    let mut save_path = std::env::var_os("KLONDIKE_SAVE").map(PathBuf::from);
    let mut load_path = None;
    let mut args = args.iter();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--cui" => cui = true,
            "--seed" => seed = args.next().and_then(|value| value.parse::<u64>().ok()),
            "--save" => save_path = args.next().map(PathBuf::from).or(save_path),
            "--load" => load_path = args.next().map(PathBuf::from),
            _ => {}
        }
    }
    CliOptions {
        cui,
        seed,
        save_path,
        load_path,
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if options.cui {
        let launch = klondike_cui::LaunchOptions {
            seed: options.seed,
            save_path: options.save_path,
            load_path: options.load_path,
            log_file: std::env::var_os("KLONDIKE_LOG_FILE").map(PathBuf::from),
        };
        if let Err(err) = klondike_cui::run(launch) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }
    init_tracing();
    if let Err(err) = run_repl(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_repl(options: CliOptions) -> Result<()> {
    let mut session = Session::start(options)?;
    tracing::debug!(seed = ?session.game.deal_seed(), "klondike-cli starting");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_help(&mut stdout)?;
    session.print_board(&mut stdout)?;
    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "klondike> ")?;
        stdout.flush()?;
        let Some(line) = lines.next() else {
            writeln!(stdout)?;
            break;
        };
        let line = line.context("read command")?;
        if session.execute(&line, &mut stdout)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Session {
    game: Game,
    events: EventBus,
    save_path: Option<PathBuf>,
}

impl Session {
    fn start(options: CliOptions) -> Result<Self> {
        let mut events = EventBus::default();
        let game = match options.load_path.as_ref() {
            Some(path) => load_state_file(path)
                .map_err(|err| anyhow::anyhow!(err))
                .with_context(|| format!("load saved game from {}", path.display()))?,
            None => {
                let mut game = match options.seed {
                    Some(seed) => Game::new(seed),
                    None => Game::from_entropy(),
                };
                game.new_game(&mut events).context("deal first game")?;
                game
            }
        };
        // The opening deal is shown by the first board print.
        events.drain().for_each(drop);
        Ok(Self {
            game,
            events,
            save_path: options.save_path.or_else(default_state_path),
        })
    }

    fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let input = line.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        let mut show_board = true;
        match cmd {
            "help" | "h" | "?" => {
                print_help(out)?;
                show_board = false;
            }
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "board" | "b" | "ls" => {}
            "draw" | "d" => match self.game.draw_stock(&mut self.events) {
                StockAction::Drawn(card) => writeln!(out, "drew {card}")?,
                StockAction::Recycled(count) => writeln!(out, "recycled {count} cards")?,
                StockAction::NoOp => writeln!(out, "nothing to draw")?,
            },
            "move" | "m" => {
                let [source, target] = args.as_slice() else {
                    writeln!(out, "usage: move <src> <dst>")?;
                    return Ok(Flow::Continue);
                };
                let result = self.move_cards(source, target);
                show_board = self.report(result, out)?;
            }
            "auto" | "a" => {
                let [source] = args.as_slice() else {
                    writeln!(out, "usage: auto <src>")?;
                    return Ok(Flow::Continue);
                };
                let result = self.auto_play(source);
                show_board = self.report(result, out)?;
            }
            "new" | "n" => {
                let result = match args.first() {
                    Some(value) => match value.parse::<u64>() {
                        Ok(seed) => self.game.new_game_with_seed(seed, &mut self.events),
                        Err(_) => {
                            writeln!(out, "invalid seed '{value}'")?;
                            return Ok(Flow::Continue);
                        }
                    },
                    None => self.game.new_game(&mut self.events),
                };
                if let Err(err) = result {
                    writeln!(out, "error: {err}")?;
                }
            }
            "again" => {
                if let Err(err) = self.game.deal_again(&mut self.events) {
                    writeln!(out, "error: {err}")?;
                }
            }
            "save" => {
                show_board = false;
                let Some(path) = args.first().map(PathBuf::from).or_else(|| self.save_path.clone())
                else {
                    writeln!(out, "save path unavailable")?;
                    return Ok(Flow::Continue);
                };
                match save_state_file(&self.game, &path) {
                    Ok(()) => writeln!(out, "saved to {}", path.display())?,
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "save failed");
                        writeln!(out, "save failed: {err}")?;
                    }
                }
            }
            "load" => {
                let Some(path) = args.first().map(PathBuf::from).or_else(|| self.save_path.clone())
                else {
                    writeln!(out, "load path unavailable")?;
                    return Ok(Flow::Continue);
                };
                match load_state_file(&path) {
                    Ok(game) => {
                        self.game = game;
                        writeln!(out, "loaded {}", path.display())?;
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "load failed");
                        writeln!(out, "load failed: {err}")?;
                        show_board = false;
                    }
                }
            }
            other => {
                writeln!(out, "unknown command '{other}', type help")?;
                show_board = false;
            }
        }
        drain_events(&mut self.events, out)?;
        if show_board {
            self.print_board(out)?;
        }
        Ok(Flow::Continue)
    }

    /// Moves go through the same pick-up-then-drop path as the terminal UI.
    fn move_cards(&mut self, source: &str, target: &str) -> CommandResult {
        let (pile, index) = resolve_source(self.game.board(), source)?;
        let target = parse_pile(target)?;
        let card = card_at(self.game.board(), pile, index)?;
        let grant = self.game.begin_drag(card, pile, index)?;
        if !grant.permitted {
            return Err(CommandError::Usage(format!("cannot pick up {}", card_text(&card))));
        }
        Ok(self.game.drop(target, &mut self.events)?)
    }

    fn auto_play(&mut self, source: &str) -> CommandResult {
        let (pile, index) = resolve_source(self.game.board(), source)?;
        let card = card_at(self.game.board(), pile, index)?;
        Ok(self.game.double_click(card, pile, index, &mut self.events)?)
    }

    /// Prints the outcome; returns whether the board changed.
    fn report(&self, result: CommandResult, out: &mut impl Write) -> io::Result<bool> {
        match result {
            Ok(MoveOutcome::Applied(report)) => {
                write!(out, "moved {} card(s) {} -> {}", report.cards, report.from, report.to)?;
                if report.score_delta > 0 {
                    write!(out, " (+{})", report.score_delta)?;
                }
                writeln!(out)?;
                Ok(true)
            }
            Ok(MoveOutcome::Rejected(reason)) => {
                writeln!(out, "rejected: {}", reason.label())?;
                Ok(false)
            }
            Err(err) => {
                writeln!(out, "{err}")?;
                Ok(false)
            }
        }
    }

    fn print_board(&self, out: &mut impl Write) -> io::Result<()> {
        let board = self.game.board();
        let phase = match self.game.phase() {
            Phase::New => "new",
            Phase::Playing => "playing",
            Phase::Won => "won",
        };
        let seed = self
            .game
            .deal_seed()
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "score {} | {} | seed {}", self.game.score(), phase, seed)?;
        let stock = if board.stock.is_empty() {
            "--".to_string()
        } else {
            format!("## x{}", board.stock.len())
        };
        let waste_start = board.waste.len().saturating_sub(3);
        writeln!(
            out,
            "stock: {stock}   waste: {}",
            pile_text(&board.waste[waste_start..])
        )?;
        let foundations: Vec<String> = board
            .foundations
            .iter()
            .enumerate()
            .map(|(slot, cards)| {
                let top = cards.last().map(card_text).unwrap_or_else(|| "--".to_string());
                format!("f{slot}: {top}")
            })
            .collect();
        writeln!(out, "{}", foundations.join("  "))?;
        for (column, cards) in board.tableau.iter().enumerate() {
            writeln!(out, "t{column}: {}", pile_text(cards))?;
        }
        if self.game.phase() == Phase::Won {
            writeln!(out, "*** you win! type new to play again ***")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("{0}")]
    Usage(String),
    #[error("error: {0}")]
    Engine(#[from] EngineError),
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        CommandError::Usage(message)
    }
}

type CommandResult = std::result::Result<MoveOutcome, CommandError>;

fn parse_pile(text: &str) -> std::result::Result<PileRef, String> {
    let text = text.trim().to_ascii_lowercase();
    match text.as_str() {
        "w" | "waste" => return Ok(PileRef::WASTE),
        "s" | "stock" => return Ok(PileRef::STOCK),
        _ => {}
    }
    let (kind, digits) = if let Some(rest) = text.strip_prefix('f') {
        (PileKind::Foundation, rest)
    } else if let Some(rest) = text.strip_prefix('t') {
        (PileKind::Tableau, rest)
    } else {
        return Err(format!("unknown pile '{text}'"));
    };
    let index = digits
        .parse::<usize>()
        .map_err(|_| format!("invalid pile index in '{text}'"))?;
    if index >= kind.pile_count() {
        return Err(format!("no such pile '{text}'"));
    }
    Ok(PileRef { kind, index })
}

/// Resolves `w`, `f<i>`, `t<i>` to the pile's top card, and `t<i>:<card>`
/// to a deeper card named by index (`t3:2`) or by label (`t3:9h`).
fn resolve_source(board: &Board, text: &str) -> std::result::Result<(PileRef, usize), String> {
    let (pile_text, card_text) = match text.split_once(':') {
        Some((pile, card)) => (pile, Some(card)),
        None => (text, None),
    };
    let pile = parse_pile(pile_text)?;
    let cards = board.pile(pile).unwrap_or(&[]);
    let Some(card_text) = card_text else {
        return cards
            .len()
            .checked_sub(1)
            .map(|top| (pile, top))
            .ok_or_else(|| format!("{pile} is empty"));
    };
    if pile.kind != PileKind::Tableau {
        return Err(format!("only tableau sources take a card, got '{text}'"));
    }
    if let Ok(index) = card_text.parse::<usize>() {
        if index >= cards.len() {
            return Err(format!("{pile} has no card {index}"));
        }
        return Ok((pile, index));
    }
    let (rank, suit) = parse_card_label(card_text)?;
    cards
        .iter()
        .position(|card| card.face_up && card.rank == rank && card.suit == suit)
        .map(|index| (pile, index))
        .ok_or_else(|| format!("{card_text} is not face up on {pile}"))
}

fn parse_card_label(text: &str) -> std::result::Result<(Rank, Suit), String> {
    let text = text.trim();
    let mut chars = text.chars();
    let suit_char = chars
        .next_back()
        .ok_or_else(|| "missing card".to_string())?;
    let suit = match suit_char.to_ascii_lowercase() {
        'h' | '♥' => Suit::Hearts,
        'd' | '♦' => Suit::Diamonds,
        'c' | '♣' => Suit::Clubs,
        's' | '♠' => Suit::Spades,
        _ => return Err(format!("unknown suit in '{text}'")),
    };
    let rank = match chars.as_str().to_ascii_uppercase().as_str() {
        "A" | "1" => Rank::Ace,
        "J" | "11" => Rank::Jack,
        "Q" | "12" => Rank::Queen,
        "K" | "13" => Rank::King,
        "T" => Rank::Ten,
        digits => digits
            .parse::<u8>()
            .ok()
            .and_then(Rank::from_value)
            .ok_or_else(|| format!("unknown rank in '{text}'"))?,
    };
    Ok((rank, suit))
}

fn card_at(board: &Board, pile: PileRef, index: usize) -> std::result::Result<Card, String> {
    board
        .pile(pile)
        .and_then(|cards| cards.get(index))
        .copied()
        .ok_or_else(|| format!("{pile} has no card {index}"))
}

fn card_text(card: &Card) -> String {
    if card.face_up {
        card.to_string()
    } else {
        "##".to_string()
    }
}

fn pile_text(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "--".to_string();
    }
    cards.iter().map(card_text).collect::<Vec<_>>().join(" ")
}

fn drain_events(events: &mut EventBus, out: &mut impl Write) -> io::Result<()> {
    for event in events.drain() {
        match event {
            Event::Flipped { pile, card } => writeln!(out, "event: flipped {card} on {pile}")?,
            Event::Won { score } => writeln!(out, "event: won with {score} points")?,
            Event::Dealt { seed } => writeln!(out, "event: dealt seed {seed}")?,
            _ => {}
        }
    }
    Ok(())
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "commands:")?;
    writeln!(out, "  board                 show the table")?;
    writeln!(out, "  draw                  turn a stock card, or recycle the waste")?;
    writeln!(out, "  move <src> <dst>      e.g. move w t3, move t2:9h t5, move t6:4 f0")?;
    writeln!(out, "  auto <src>            send a card to whichever foundation takes it")?;
    writeln!(out, "  new [seed]            deal a new game")?;
    writeln!(out, "  again                 replay the current deal")?;
    writeln!(out, "  save [path] / load [path]")?;
    writeln!(out, "  help, quit")?;
    writeln!(out, "piles: s w f0-f3 t0-t6")?;
    Ok(())
}
