//! Error types for board setup.
//!
//! Only setup can fail loudly. Game-rule outcomes such as a blocked move are
//! silent no-ops, and engine contract violations panic.

use thiserror::Error;

/// Failures raised while building or configuring a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// No preset is registered under the requested name.
    #[error("unrecognized board name: {0:?}")]
    UnknownBoard(String),
    /// A board that already carries a game id was given a different one.
    #[error("a game with id {current} may not be assigned the new id {requested}")]
    GameIdAlreadySet {
        /// The id the board already has.
        current: u32,
        /// The id that was rejected.
        requested: u32,
    },
    /// The requested number of players does not fit the board.
    #[error("cannot seat {requested} players (board supports 1..={max})")]
    PlayerCount {
        /// Number of players requested.
        requested: usize,
        /// Maximum number of players the board has start cells for.
        max: usize,
    },
    /// A board needs at least one row and one column.
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
}

/// Result type for board setup.
pub type SetupResult<T> = Result<T, SetupError>;
