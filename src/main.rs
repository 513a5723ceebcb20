//! Roborally CLI - run and batch autopilot games from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use roborally::presets::ADVANCED_BOARD;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Roborally - a programmable robot race engine
#[derive(Parser, Debug)]
#[command(name = "roborally")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single autopilot game
    Run {
        /// Board preset name (see `boards`)
        #[arg(short, long, default_value = ADVANCED_BOARD)]
        board: String,

        /// Number of players (1-6)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum rounds (default: 100)
        #[arg(short, long, default_value = "100")]
        rounds: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Execute registers one player step at a time
        #[arg(long)]
        step: bool,

        /// Suppress the header and final board
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many seeded games in parallel and aggregate statistics
    Batch {
        /// Board preset name (see `boards`)
        #[arg(short, long, default_value = ADVANCED_BOARD)]
        board: String,

        /// Number of players (1-6)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum rounds per game (default: 100)
        #[arg(short, long, default_value = "100")]
        rounds: u32,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// List the available board presets
    Boards,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            board,
            players,
            seed,
            rounds,
            format,
            step,
            quiet,
        } => cli::run::execute(board, players, seed, rounds, format, step, quiet),

        Commands::Batch {
            board,
            players,
            games,
            seed,
            rounds,
            threads,
            format,
            progress,
        } => cli::batch::execute(board, players, games, seed, rounds, threads, format, progress),

        Commands::Boards => {
            cli::boards::execute();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
