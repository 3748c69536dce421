//! pond: play chess against a UCI engine in the terminal.

mod config;
mod input;
mod presenter;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{
    Color, CoordinatorError, Engine, EngineSource, InteractiveSource, MoveSource, SourceError,
    TurnCoordinator,
};
use random_engine::RandomEngine;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uci_client::{EngineConfig, UciEngine};

use config::{GameConfig, Overrides, Side};
use presenter::ConsolePresenter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Side the human plays
    #[arg(long, value_enum)]
    side: Option<Side>,

    /// UCI engine executable
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Engine search depth
    #[arg(long)]
    depth: Option<u8>,

    /// Start from this FEN instead of the initial position
    #[arg(long)]
    fen: Option<String>,

    /// Debug logging, including engine traffic at trace level via RUST_LOG
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = GameConfig::load(
        args.config.as_deref(),
        Overrides {
            side: args.side,
            engine: args.engine,
            depth: args.depth,
            fen: args.fen,
        },
    )
    .context("invalid configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime.block_on(play(config));
    // Stdin reads park a blocking thread that never finishes on its own.
    runtime.shutdown_background();
    outcome
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_engine(config: &EngineConfig) -> Result<Box<dyn Engine>> {
    let mut engine: Box<dyn Engine> = match &config.path {
        Some(path) => Box::new(
            UciEngine::spawn(config)
                .with_context(|| format!("failed to start engine {}", path.display()))?,
        ),
        None => {
            warn!("no engine configured, the computer plays random moves");
            Box::new(RandomEngine::new())
        }
    };
    engine.new_game().context("engine rejected new game")?;
    Ok(engine)
}

async fn play(config: GameConfig) -> Result<()> {
    let position = config.start_position()?;
    let human = config.human_color();
    let presenter = Arc::new(ConsolePresenter::new(config.board_orientation(), human));

    let engine = build_engine(&config.engine)?;
    info!(engine = engine.name(), %human, "starting game");
    let engine: Box<dyn MoveSource> = Box::new(EngineSource::new(engine, config.engine.budget()));
    let (interactive, handle) = InteractiveSource::new(presenter.clone());
    let interactive: Box<dyn MoveSource> = Box::new(interactive);
    let (white, black) = match human {
        Color::White => (interactive, engine),
        Color::Black => (engine, interactive),
    };

    let mut coordinator = TurnCoordinator::new(position, white, black, presenter.clone());
    presenter.show(coordinator.mirror());
    let input = tokio::spawn(input::read_commands(presenter, handle));

    let outcome = coordinator.run().await;
    input.abort();
    match outcome {
        Ok(result) => {
            info!(%result, moves = coordinator.position().moves().len(), "game finished");
            Ok(())
        }
        Err(CoordinatorError::Source {
            source: SourceError::InputClosed,
            ..
        }) => {
            info!("game abandoned");
            Ok(())
        }
        Err(e) => Err(e).context("game aborted"),
    }
}
