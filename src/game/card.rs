//! Command cards and the fields that hold them.

use rand::Rng;
use serde::Serialize;

/// A robot instruction printed on a command card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Command {
    /// Move one cell forward.
    Forward,
    /// Move forward twice.
    FastForward,
    /// Move forward three times.
    FastFastForward,
    /// Move one cell backward without turning.
    Backward,
    /// Quarter turn right.
    Right,
    /// Quarter turn left.
    Left,
    /// Half turn.
    UTurn,
    /// Pause for the player to choose a left or right turn.
    RightOrLeft,
    /// Repeat the previous command.
    Again,
}

impl Command {
    /// Every command, in deck order.
    pub const ALL: [Command; 9] = [
        Command::Forward,
        Command::FastForward,
        Command::FastFastForward,
        Command::Backward,
        Command::Right,
        Command::Left,
        Command::UTurn,
        Command::RightOrLeft,
        Command::Again,
    ];

    /// Human-readable card label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Command::Forward => "Fwd",
            Command::FastForward => "Fast Fwd",
            Command::FastFastForward => "Fast Fast Fwd",
            Command::Backward => "Back",
            Command::Right => "Turn Right",
            Command::Left => "Turn Left",
            Command::UTurn => "U-Turn",
            Command::RightOrLeft => "Left OR Right",
            Command::Again => "Again",
        }
    }
}

/// A single card dealt to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandCard {
    /// The instruction on the card.
    pub command: Command,
}

impl CommandCard {
    /// Create a card for the given command.
    #[must_use]
    pub const fn new(command: Command) -> Self {
        Self { command }
    }

    /// Draw a card uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Command::ALL[rng.gen_range(0..Command::ALL.len())])
    }
}

/// A slot that may hold one card, either a program register or a hand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandCardField {
    /// Card in this slot, if any.
    pub card: Option<CommandCard>,
    /// Whether the card is revealed to other players.
    pub visible: bool,
}

impl CommandCardField {
    /// An empty, visible slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            card: None,
            visible: true,
        }
    }

    /// The command in this slot, if a card is present.
    #[must_use]
    pub fn command(&self) -> Option<Command> {
        self.card.map(|card| card.command)
    }
}

/// Addresses one of a player's card slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardSlot {
    /// Program register `0..REGISTER_COUNT`.
    Program(usize),
    /// Hand slot `0..HAND_SIZE`.
    Hand(usize),
}
