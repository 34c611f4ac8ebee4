use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use std::io::{stdin, stdout};
use std::time::Instant;

use connect4_minimax::{
    engine::{Engine, EngineConfig},
    node::evaluate,
    position::Position,
    protocol::ProtocolAdapter,
    DEFAULT_DEPTH, ENGINE_NAME,
};

/// A depth-limited minimax Connect 4 engine
#[derive(Parser)]
#[command(name = "connect4_minimax")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of plies searched for every engine move
    #[arg(long, default_value_t = DEFAULT_DEPTH as u64, value_parser = clap::value_parser!(u64).range(1..=12))]
    depth: u64,

    /// Name reported to the coordinator
    #[arg(long, default_value = ENGINE_NAME)]
    name: String,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to a game coordinator over stdin and stdout (the default)
    Protocol {
        /// Draw the board to stderr after every move
        #[arg(long)]
        show_board: bool,
    },
    /// Count the leaves of the game tree for every depth up to MAX_DEPTH
    Perft {
        /// Moves leading to the position to count from, as column digits
        #[arg(long, default_value = "")]
        moves: String,

        #[arg(value_parser = clap::value_parser!(u64).range(1..=10))]
        max_depth: u64,
    },
    /// Draw a position with its evaluation and the engine's reply
    Show {
        /// Moves leading to the position, as column digits
        #[arg(long, default_value = "")]
        moves: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // stdout carries protocol replies, so logs go to stderr
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let engine = Engine::with_config(EngineConfig {
        name: cli.name,
        depth: cli.depth as usize,
    });

    match cli.command {
        Some(Commands::Protocol { show_board }) => run_protocol(engine, show_board),
        None => run_protocol(engine, false),
        Some(Commands::Perft { moves, max_depth }) => run_perft(engine, &moves, max_depth as usize),
        Some(Commands::Show { moves }) => run_show(engine, &moves),
    }
}

fn run_protocol(engine: Engine, show_board: bool) -> Result<()> {
    let stdin = stdin();
    let stdout = stdout();
    ProtocolAdapter::new(engine)
        .with_board_display(show_board)
        .run(stdin.lock(), stdout.lock())
}

fn run_perft(engine: Engine, moves: &str, max_depth: usize) -> Result<()> {
    let position = Position::from_moves(moves)
        .with_context(|| format!("invalid move string '{}'", moves))?;
    let engine = engine.with_position(position);

    let bar = ProgressBar::new(max_depth as u64);
    bar.set_style(
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}"),
    );

    let mut results = Vec::with_capacity(max_depth);
    for depth in 1..=max_depth {
        bar.set_message(&format!("depth {}", depth));
        let start_time = Instant::now();
        let count = engine.node_count(depth);
        let finish_time = Instant::now();
        results.push((depth, count, finish_time - start_time));
        bar.inc(1);
    }
    bar.finish_and_clear();

    for (depth, count, time) in results {
        println!(
            "perft {}: {} leaves, time: {:.6}ms, kpos/s: {:.1}",
            depth,
            count,
            time.as_secs_f64() * 1000.0,
            count as f64 / (1000.0 * time.as_secs_f64().max(f64::EPSILON))
        );
    }
    Ok(())
}

fn run_show(engine: Engine, moves: &str) -> Result<()> {
    let position = Position::from_moves(moves)
        .with_context(|| format!("invalid move string '{}'", moves))?;
    position
        .display(&mut stdout())
        .context("Failed to draw board!")?;
    println!("Evaluation: {}", evaluate(&position));

    if position.is_terminal() {
        println!("Game over");
        return Ok(());
    }
    if position.num_moves() % 2 == 1 {
        println!("Player 2 is to move, searching for player 1 anyway");
    }

    let mut engine = engine.with_position(position);
    let (column, score) = engine.best_move()?;
    println!("Best move for player 1: {} (score {})", column, score);
    Ok(())
}
