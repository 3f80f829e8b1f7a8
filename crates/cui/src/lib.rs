mod actions;
mod app;
mod celebration;
mod input;
pub mod persistence;
mod view;

use anyhow::{Context, Result};
use app::{App, TICK_RATE};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub save_path: Option<PathBuf>,
    pub load_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let log_file = options
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("klondike-cui.log"));
    let _log_guard = init_tracing(&log_file);

    let mut app = App::bootstrap(options.seed, options.save_path, options.load_path)?;
    tracing::info!(seed = ?app.game.deal_seed(), "klondike-cui starting");

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

/// Reads `--seed`, `--save`, `--load` and `--log-file`, falling back to the
/// `KLONDIKE_*` environment variables. Unknown flags are ignored.
pub fn parse_options(args: &[String]) -> LaunchOptions {
    let mut seed = std::env::var("KLONDIKE_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok());
    let mut save_path = std::env::var_os("KLONDIKE_SAVE").map(PathBuf::from);
    let mut load_path = None;
    let mut log_file = std::env::var_os("KLONDIKE_LOG_FILE").map(PathBuf::from);
    let mut args = args.iter();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--seed" => seed = args.next().and_then(|value| value.parse::<u64>().ok()),
            "--save" => save_path = args.next().map(PathBuf::from).or(save_path),
            "--load" => load_path = args.next().map(PathBuf::from),
            "--log-file" => log_file = args.next().map(PathBuf::from).or(log_file),
            _ => {}
        }
    }
    LaunchOptions {
        seed,
        save_path,
        load_path,
        log_file,
    }
}

/// The terminal is in raw mode while the UI runs, so logs go to a file.
/// Best effort: a second subscriber or an unwritable path leaves logging off.
/// The returned guard flushes buffered lines when dropped.
fn init_tracing(path: &Path) -> Option<WorkerGuard> {
    let appender = file_appender(path)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();
    Some(guard)
}

/// Single, never-rotated log file at exactly `path`.
fn file_appender(path: &Path) -> Option<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path.file_name()?.to_str()?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .ok()
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let size = terminal.size().context("read terminal size")?;
    app.set_arena(size.width.saturating_sub(2), size.height.saturating_sub(2));
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(TICK_RATE)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        } else {
            let size = terminal.size().context("read terminal size")?;
            app.on_tick(size.width.saturating_sub(2), size.height.saturating_sub(2));
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "klondike-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}
