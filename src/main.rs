use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal;
use qix::{CliRenderer, Game, GameConfig, Input, Renderer};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

// Game logic update rate (controls gameplay speed)
const GAME_UPDATE_RATE: Duration = Duration::from_millis(100); // 10 updates/sec

#[derive(Parser)]
#[command(name = "qix-cli")]
#[command(about = "Claim territory from the qix, one stroke at a time")]
struct Args {
    /// Seed for enemy movement and teleports; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,

    /// Field width in cells; defaults to the terminal size
    #[arg(long)]
    width: Option<i32>,

    /// Field height in cells; defaults to the terminal size
    #[arg(long)]
    height: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        SubscriberBuilder::default()
            .with_target(false)
            .with_ansi(false)
            .with_max_level(args.log_level)
            .with_writer(Mutex::new(file))
            .init();
    }

    // Each cell is 2 chars wide, and 4 lines at the bottom are kept for info.
    let (term_width, term_height) = terminal::size()?;
    let width = args.width.unwrap_or((term_width / 2) as i32);
    let height = args
        .height
        .unwrap_or((term_height as i32 - 4).max(0));

    let config = GameConfig {
        seed: args.seed,
        ..GameConfig::for_terminal(width, height)
    };
    let mut game = Game::new(config).context("invalid game configuration")?;
    tracing::info!(
        width = game.width(),
        height = game.height(),
        seed = ?args.seed,
        "starting game"
    );

    let mut renderer = CliRenderer::new();
    renderer.init()?;

    let mut last_game_update = Instant::now();

    loop {
        if let Some(input) = renderer.poll_input()? {
            match input {
                Input::Direction(direction) => game.set_direction(direction),
                Input::Stop => game.stop(),
                Input::Teleport => game.teleport(),
                Input::Restart => game.reset(),
                Input::Quit => break,
            }
        }

        // Update game logic at fixed rate
        if last_game_update.elapsed() >= GAME_UPDATE_RATE {
            game.update();
            last_game_update = Instant::now();
        }

        // The renderer manages its own frame rate
        renderer.render(&game)?;
    }

    renderer.cleanup()?;
    tracing::info!(level = game.level, score = game.score(), "quit");
    Ok(())
}
