//! Change notifications emitted by the board.
//!
//! Every play-time mutation of observable state appends one event, in the
//! order the mutations happen. Setup calls that draw walls, add field actions
//! or set the checkpoint count do not emit events. A view layer drains them
//! with [`Board::take_events`](crate::game::Board::take_events).

use crate::game::{Coord, Heading, Phase, PlayerId};

/// A single observable state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A player joined the board.
    PlayerAdded(PlayerId),
    /// A player changed cell (or was placed/removed).
    PlayerMoved {
        /// The player that moved.
        player: PlayerId,
        /// Previous cell.
        from: Option<Coord>,
        /// New cell.
        to: Option<Coord>,
    },
    /// A player turned.
    HeadingChanged {
        /// The player that turned.
        player: PlayerId,
        /// New heading.
        heading: Heading,
    },
    /// A player's registers or hand changed.
    CardsChanged(PlayerId),
    /// A player reached their next checkpoint.
    CheckpointReached {
        /// The player.
        player: PlayerId,
        /// The checkpoint they must reach now.
        next_checkpoint: u32,
    },
    /// The game phase changed.
    PhaseChanged(Phase),
    /// The active register changed.
    StepChanged(usize),
    /// Single-step mode was toggled.
    StepModeChanged(bool),
    /// The current player changed.
    CurrentPlayerChanged(Option<PlayerId>),
    /// The round counter changed.
    CounterChanged(u32),
    /// The board was assigned a game id.
    GameIdAssigned(u32),
}
