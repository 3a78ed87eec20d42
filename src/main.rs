mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::Print,
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};

use fruit_frenzy::config::GameConfig;
use fruit_frenzy::entities::{Direction, GameStatus};
use fruit_frenzy::score::{FileStore, HighScoreStore, MemoryStore};
use fruit_frenzy::session::{Command, Game};

/// How long to wait for input when no tick is pending.
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "fruit_frenzy", about = "Catch the falling fruit in your basket")]
struct Cli {
    /// TOML file overriding field size, speeds, lives and tick interval
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept (default: ~/.fruit_frenzy_score)
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Do not ring the terminal bell on a catch
    #[arg(long)]
    mute: bool,
}

// ── Input mapping ─────────────────────────────────────────────────────────────

enum Input {
    Game(Command),
    Quit,
}

/// One game command per key-press event.  Unknown keys map to `None`.
fn map_key(key: KeyEvent, status: GameStatus) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Input::Quit)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Input::Quit),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Command::Move(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Command::Move(Direction::Right)
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Command::Move(Direction::Down)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Enter | KeyCode::Char(' ') => match status {
            GameStatus::GameOver => Command::Restart,
            _ => Command::Start,
        },
        _ => return None,
    };
    Some(Input::Game(command))
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Catch feedback through the terminal bell.  Queued with the next frame so
/// it never blocks a tick.
fn ring_bell<W: Write>(out: &mut W, muted: bool) -> std::io::Result<()> {
    if !muted {
        out.queue(Print("\x07"))?;
    }
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Single-threaded driver: input and ticks are handled one at a time on
/// this thread.  Returns when the player quits or the input thread dies.
fn game_loop<W: Write, S: HighScoreStore>(
    out: &mut W,
    game: &mut Game<S>,
    rx: &mpsc::Receiver<Event>,
    muted: bool,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    display::render(out, &game.snapshot())?;

    loop {
        let now = Instant::now();
        if game.scheduler().due(now) {
            let outcome = game.tick(now, &mut rng);
            if outcome.caught > 0 {
                ring_bell(out, muted)?;
            }
            display::render(out, &game.snapshot())?;
        }

        let wait = game
            .scheduler()
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL);

        match rx.recv_timeout(wait) {
            Ok(Event::Key(key)) => match map_key(key, game.status()) {
                Some(Input::Quit) => return Ok(()),
                Some(Input::Game(command)) => {
                    game.handle(command, Instant::now(), &mut rng);
                    display::render(out, &game.snapshot())?;
                }
                None => {}
            },
            Ok(Event::Resize(..)) => display::render(out, &game.snapshot())?,
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Log to a file; the terminal is in raw mode and owned by the renderer.
fn init_logging() {
    let log_path = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("fruit_frenzy")
        .join("fruit_frenzy.log");
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir).ok();
    }

    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let Ok(log_file) =
        std::fs::File::create(&log_path).or_else(|_| std::fs::File::create(null_device))
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> GameConfig {
    let config = match path {
        Some(path) => {
            let (config, err) = GameConfig::load_or_default(path);
            if let Some(err) = err {
                warn!("using default config: {err}");
            }
            config
        }
        None => GameConfig::default(),
    };
    for warning in config.validate() {
        warn!("config: {warning}");
    }
    config
}

/// Restore terminal state — used by `TerminalGuard` and the panic hook.
fn restore_terminal() {
    let mut out = stdout();
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Held from before raw mode is enabled until `main` returns.  On drop the
/// scheduler is closed first, then the terminal is restored, whichever way
/// `main` exits.
struct TerminalGuard<'a, S: HighScoreStore> {
    game: &'a mut Game<S>,
    restore: fn(),
}

impl<S: HighScoreStore> Drop for TerminalGuard<'_, S> {
    fn drop(&mut self) {
        self.game.close();
        (self.restore)();
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = load_config(cli.config.as_ref());
    let store: Box<dyn HighScoreStore> = if cli.no_save {
        Box::new(MemoryStore::default())
    } else {
        let store =
            FileStore::new(cli.high_score_file.clone().unwrap_or_else(FileStore::default_path));
        info!(path = %store.path().display(), "high score file");
        Box::new(store)
    };
    let mut game = Game::new(config, store);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let mut out = BufWriter::new(stdout());
    let mut guard = TerminalGuard {
        game: &mut game,
        restore: restore_terminal,
    };
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut *guard.game, &rx, cli.mute);

    let _ = out.flush();
    drop(guard);
    info!("closed");

    Ok(result?)
}
