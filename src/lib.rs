// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Roborally: a rules engine for a programmable robot race.
//!
//! Players program five registers from a hand of command cards, then the
//! engine executes the registers in lockstep across all robots on a toroidal
//! board with walls, conveyor belts and ordered checkpoints.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / batch simulation (rayon)    │
//! ├─────────────────────────────────────┤
//! │   Presets + autopilot simulation    │
//! ├─────────────────────────────────────┤
//! │   GameController (phases, moves)    │
//! ├─────────────────────────────────────┤
//! │   Board, spaces, players, actions   │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod presets;
pub mod simulation;

pub use error::{SetupError, SetupResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, BoardEvent, CardSlot, Command, CommandCard, Coord, FieldAction, GameController,
    Heading, Phase, Player, PlayerId, TurnChoice,
};
