//! Player state management.

use crate::game::{CardSlot, Command, CommandCardField, Coord, Heading};

/// Index of a player in board order.
pub type PlayerId = usize;

/// Number of program registers each player fills per round.
pub const REGISTER_COUNT: usize = 5;

/// Number of cards dealt to each player per round.
pub const HAND_SIZE: usize = 8;

/// State for a single robot.
///
/// The player's position is owned by the [`Board`](crate::game::Board), which
/// keeps it consistent with the occupant of the corresponding space. Outside
/// the crate it is read-only.
#[derive(Debug, Clone)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Display colour.
    pub color: String,
    space: Option<Coord>,
    heading: Heading,
    program: [CommandCardField; REGISTER_COUNT],
    cards: [CommandCardField; HAND_SIZE],
    next_checkpoint: u32,
    last_command: Option<Command>,
}

impl Player {
    /// Create an unplaced player facing south with empty registers and hand.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            space: None,
            heading: Heading::South,
            program: [CommandCardField::empty(); REGISTER_COUNT],
            cards: [CommandCardField::empty(); HAND_SIZE],
            next_checkpoint: 1,
            last_command: None,
        }
    }

    /// Cell the player stands on, if placed.
    #[must_use]
    pub const fn space(&self) -> Option<Coord> {
        self.space
    }

    /// Current heading.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Sequence number of the checkpoint this player must reach next.
    #[must_use]
    pub const fn next_checkpoint(&self) -> u32 {
        self.next_checkpoint
    }

    /// Last command executed, used by `AGAIN`.
    #[must_use]
    pub const fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    /// Program register `index`.
    #[must_use]
    pub fn program_field(&self, index: usize) -> Option<&CommandCardField> {
        self.program.get(index)
    }

    /// Hand slot `index`.
    #[must_use]
    pub fn card_field(&self, index: usize) -> Option<&CommandCardField> {
        self.cards.get(index)
    }

    /// All program registers.
    #[must_use]
    pub fn program(&self) -> &[CommandCardField; REGISTER_COUNT] {
        &self.program
    }

    /// All hand slots.
    #[must_use]
    pub fn cards(&self) -> &[CommandCardField; HAND_SIZE] {
        &self.cards
    }

    /// Look up either kind of slot.
    #[must_use]
    pub fn field(&self, slot: CardSlot) -> Option<&CommandCardField> {
        match slot {
            CardSlot::Program(i) => self.program.get(i),
            CardSlot::Hand(i) => self.cards.get(i),
        }
    }

    pub(crate) fn field_mut(&mut self, slot: CardSlot) -> Option<&mut CommandCardField> {
        match slot {
            CardSlot::Program(i) => self.program.get_mut(i),
            CardSlot::Hand(i) => self.cards.get_mut(i),
        }
    }

    pub(crate) fn program_mut(&mut self) -> &mut [CommandCardField; REGISTER_COUNT] {
        &mut self.program
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [CommandCardField; HAND_SIZE] {
        &mut self.cards
    }

    pub(crate) fn set_space(&mut self, space: Option<Coord>) {
        self.space = space;
    }

    pub(crate) fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    pub(crate) fn set_last_command(&mut self, command: Option<Command>) {
        self.last_command = command;
    }

    pub(crate) fn increment_next_checkpoint(&mut self) {
        self.next_checkpoint += 1;
    }
}
