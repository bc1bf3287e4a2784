//! Frost roll widget TUI application.
//!
//! A number display and a button. Most presses show 69; one in ten shows
//! 67, freezes the button and lets snow fall until the ice melts.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for
//! automated testing:
//!
//! ```bash
//! printf 'go\nrun\nstatus\n' | cargo run -p frost -- --headless --seed 7
//! ```

mod app;
mod events;
mod headless;
mod logging;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use frost_core::{BoxedMachine, HeadlessWidget, WidgetConfig};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{error, info};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Terminal roll widget with a rare frozen outcome
#[derive(Parser, Debug)]
#[command(name = "frost")]
#[command(about = "Terminal roll widget with a rare frozen outcome")]
#[command(version)]
struct Args {
    /// Run the line-oriented headless protocol on stdin/stdout
    #[arg(long)]
    headless: bool,

    /// JSON config file (falls back to FROST_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible outcomes and particles
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of particles per rare roll
    #[arg(short, long)]
    particles: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.headless {
        logging::init_stderr()?;
        return run_headless(config, args.seed);
    }

    let log_file = std::env::var_os("FROST_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("frost.log"));
    logging::init_file(&log_file)?;

    let machine = BoxedMachine::boxed(config, args.seed)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let app = App::new(machine, Rect::new(0, 0, size.width, size.height));
    info!(seed = ?args.seed, "widget mounted");

    // Run app
    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("{e:#}");
    }
    result
}

/// Defaults, then the JSON file, then `FROST_*` variables, then flags.
fn load_config(args: &Args) -> Result<WidgetConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("FROST_CONFIG").map(PathBuf::from));

    let mut config = match path {
        Some(path) => WidgetConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => WidgetConfig::default(),
    };
    config = config.with_env_overrides()?;
    if let Some(count) = args.particles {
        config = config.with_particle_count(count);
    }
    config.validate()?;
    Ok(config)
}

fn run_headless(config: WidgetConfig, seed: Option<u64>) -> Result<()> {
    let mut widget = HeadlessWidget::from_machine(BoxedMachine::boxed(config, seed)?);
    let stdin = io::stdin();
    headless::run_headless(&mut widget, stdin.lock(), &mut io::stdout())?;
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        app.tick();
        let mut drawn = None;
        terminal.draw(|f| drawn = Some(render(f, &app)))?;
        if let Some(layout) = drawn {
            app.set_layout(layout);
        }

        if app.should_quit {
            break;
        }

        let wait = app.next_wake(app.now()).max(Duration::from_millis(1));
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(ev)) => {
                    if handle_event(&mut app, ev) == EventResult::Quit {
                        app.should_quit = true;
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = tokio::time::sleep(wait) => {}
        }
    }

    app.teardown();
    info!("widget torn down");
    Ok(())
}
