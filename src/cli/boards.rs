//! Boards command implementation.

use roborally::presets::PRESETS;

/// List every board preset with its size and checkpoint count.
pub(crate) fn execute() {
    for preset in PRESETS {
        println!(
            "{:<26} {:>2}x{:<2}  {} checkpoints, up to {} players",
            preset.name,
            preset.width,
            preset.height,
            preset.checkpoints,
            preset.max_players()
        );
    }
}
