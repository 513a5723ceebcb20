//! Batch command implementation.

use super::output::{format_batch_csv, format_batch_text, BatchStats, JsonBatchResult};
use super::{seed_or_clock, BatchFormat, CliError};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use roborally::presets;
use roborally::simulation::{run_game, SimulationConfig};
use roborally::SetupError;
use std::time::Instant;

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the board or player count is invalid.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    board: String,
    players: usize,
    games: u64,
    seed: Option<u64>,
    rounds: u32,
    threads: Option<usize>,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Reject bad setups up front instead of failing every game
    let max = presets::preset(&board)?.max_players();
    if players == 0 || players > max {
        return Err(SetupError::PlayerCount {
            requested: players,
            max,
        }
        .into());
    }

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);
    let config = SimulationConfig {
        board,
        players,
        max_rounds: rounds,
        step_mode: false,
    };

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread accumulates into its own BatchStats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || BatchStats::new(players),
            |mut local_stats, i| {
                let game_seed = base_seed.wrapping_add(i);
                if let Ok(result) = run_game(game_seed, &config) {
                    local_stats.add_result(&result);
                }
                local_stats
            },
        )
        .reduce(
            || BatchStats::new(players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.set_position(stats.games_played);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats, &config.board));
            println!();
            println!("Duration: {:.2}s ({:.0} games/sec)", duration.as_secs_f64(), games_per_sec);
        }
        BatchFormat::Json => {
            let json_result = JsonBatchResult::from_stats(&stats, &config.board, base_seed);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        BatchFormat::Csv => {
            print!("{}", format_batch_csv(&stats));
        }
    }

    Ok(())
}
