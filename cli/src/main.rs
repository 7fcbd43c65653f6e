//! marg - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`marg_session`] (application state) and [`marg_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed
//! cleanup.
//!
//! # Event loop
//!
//! A fixed render cadence drives everything:
//!
//! 1. Wait for frame tick
//! 2. Drain pending key events (non-blocking poll)
//! 3. Advance view state (reveal effect, spinner)
//! 4. Drain settled assistant/catalog replies into session state
//! 5. Render frame

use std::io::{Stdout, stdout};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use std::{env, fs};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use url::Url;

use marg_config::MargConfig;
use marg_gateway::{HttpAssistantGateway, HttpGuidanceCatalog};
use marg_session::App;
use marg_tui::{KeyOutcome, Tui, UiOptions};

const FRAME_DURATION: Duration = Duration::from_millis(16);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.marg/logs/marg.log
    if let Some(config_path) = MargConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("marg.log"));
    }

    // Fallback: ./.marg/logs/marg.log (useful in constrained environments)
    candidates.push(PathBuf::from(".marg").join("logs").join("marg.log"));

    candidates
}

/// Command-line arguments. `--ask` seeds the first query exactly once; it is
/// consumed at startup and can never re-submit.
#[derive(Debug, Default)]
struct Args {
    ask: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ask" | "-a" => {
                let query = iter
                    .next()
                    .context("--ask requires a query, e.g. marg --ask \"apply for PAN\"")?;
                args.ask = Some(query);
            }
            "--help" | "-h" => {
                println!(
                    "marg - terminal assistant for Indian government services\n\n\
                     Usage: marg [--ask \"<query>\"]\n\n\
                     Options:\n  \
                     -a, --ask <query>   Submit a query as the first chat turn\n  \
                     -h, --help          Show this help"
                );
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument: {other} (try --help)"),
        }
    }
    Ok(args)
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// On drop, raw mode and the alternate screen are restored, keeping the
/// terminal usable even after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let backend = CrosstermBackend::new(out);
        let terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut args = parse_args()?;

    let config = match MargConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(path = %e.path().display(), "Ignoring unreadable config: {e}");
            MargConfig::default()
        }
    };

    let base_url = Url::parse(&config.base_url())
        .with_context(|| format!("invalid backend URL: {}", config.base_url()))?;
    let assistant = Arc::new(HttpAssistantGateway::new(base_url.clone()));
    let catalog = Arc::new(HttpGuidanceCatalog::new(base_url));

    let mut app = App::new(
        assistant,
        catalog,
        config.request_timeout(),
        config.is_authenticated(),
    );

    let app_config = config.app.as_ref();
    let options = UiOptions {
        ascii_only: app_config.is_some_and(|a| a.ascii_only),
        high_contrast: app_config.is_some_and(|a| a.high_contrast),
        reduced_motion: app_config.is_some_and(|a| a.reduced_motion),
        reveal_cps: config.reveal_cps(),
    };
    let mut tui = Tui::new(options);

    // Deep-link seeding: the argument is taken, so a later loop iteration
    // cannot submit it again.
    if let Some(query) = args.ask.take() {
        app.submit_query(&query);
    }

    let mut session = TerminalSession::new()?;
    let result = run(&mut session.terminal, &mut app, &mut tui).await;

    app.teardown();
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tui: &mut Tui,
) -> Result<()> {
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    loop {
        frames.tick().await;

        // Drain the input queue without blocking the frame.
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && tui.handle_key(app, key) == KeyOutcome::Quit
            {
                return Ok(());
            }
        }

        let now = Instant::now();
        tui.tick(now.duration_since(last_frame), app);
        last_frame = now;

        app.process_events();

        terminal.draw(|frame| tui.draw(frame, app))?;
    }
}
