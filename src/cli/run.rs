//! Run command implementation.

use super::output::{format_text, render_board};
use super::{seed_or_clock, CliError, OutputFormat};
use roborally::presets::create_board;
use roborally::simulation::{run_game, SimulationConfig};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the board or player count is invalid.
pub(crate) fn execute(
    board: String,
    players: usize,
    seed: Option<u64>,
    rounds: u32,
    format: OutputFormat,
    step: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let seed = seed_or_clock(seed);
    let config = SimulationConfig {
        board,
        players,
        max_rounds: rounds,
        step_mode: step,
    };

    if !quiet && format == OutputFormat::Text {
        println!("Running game with seed {seed}...");
        println!("Board: {} ({players} players)", config.board);
        println!();
    }

    let result = run_game(seed, &config)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result));
            if !quiet {
                let layout = create_board(&result.board)?;
                println!();
                print!("{}", render_board(&layout, &result));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
