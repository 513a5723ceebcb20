//! CLI command implementations for Roborally.

pub(crate) mod batch;
pub(crate) mod boards;
pub(crate) mod run;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<roborally::SetupError> for CliError {
    fn from(e: roborally::SetupError) -> Self {
        match e {
            roborally::SetupError::UnknownBoard(_) => {
                let names: Vec<_> = roborally::presets::board_names().collect();
                Self::new(format!("{e} (available: {})", names.join(", ")))
            }
            other => Self::new(other.to_string()),
        }
    }
}

/// Seed from the clock when the user did not pick one.
pub(crate) fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
            .unwrap_or(42)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roborally::SetupError;

    #[test]
    fn test_unknown_board_lists_presets() {
        let err = CliError::from(SetupError::UnknownBoard("Moon base".to_string()));
        let message = err.to_string();
        assert!(message.starts_with("unrecognized board name: \"Moon base\""));
        for name in roborally::presets::board_names() {
            assert!(message.contains(name), "{message} should name {name}");
        }
    }
}
