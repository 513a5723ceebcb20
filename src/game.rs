//! Game layer.
//!
//! Implements the rules of the robot race:
//! - Toroidal board with walls and per-space field actions
//! - Players with program registers, a hand of cards and checkpoint progress
//! - Conveyor belts and checkpoints
//! - The phase state machine, push movement and the end-of-round sweep

mod board;
mod card;
mod controller;
mod events;
mod field_action;
mod heading;
mod invariants;
mod player;

pub use board::{Board, Coord, Phase, Space};
pub use card::{CardSlot, Command, CommandCard, CommandCardField};
pub use controller::{GameController, LogWinner, SweepReport, TurnChoice, WinnerSink};
pub use events::BoardEvent;
pub use field_action::{conflicting_sources, ActionOutcome, FieldAction};
pub use heading::Heading;
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use player::{Player, PlayerId, HAND_SIZE, REGISTER_COUNT};
