//! Board, spaces and grid topology.
//!
//! The board is a torus: stepping off one edge re-enters on the opposite
//! edge. Walls are stored per space and block movement from both sides of a
//! boundary, even when only one of the two spaces has the wall drawn.

use serde::Serialize;
use tracing::trace;

use crate::error::{SetupError, SetupResult};
use crate::game::{
    BoardEvent, CardSlot, CommandCard, FieldAction, Heading, Player, PlayerId, REGISTER_COUNT,
};

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Stage of the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Board built, play not started.
    Initialisation,
    /// Players are filling their registers.
    Programming,
    /// Registers are being executed.
    Activation,
    /// Execution is suspended waiting for a player's left/right choice.
    PlayerInteraction,
    /// A winner was declared. Terminal.
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Initialisation => "INITIALISATION",
            Phase::Programming => "PROGRAMMING",
            Phase::Activation => "ACTIVATION",
            Phase::PlayerInteraction => "PLAYER_INTERACTION",
            Phase::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}

/// A single cell of the board.
#[derive(Debug, Clone)]
pub struct Space {
    coord: Coord,
    walls: u8,
    actions: Vec<FieldAction>,
    occupant: Option<PlayerId>,
}

impl Space {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            walls: 0,
            actions: Vec::new(),
            occupant: None,
        }
    }

    const fn wall_bit(heading: Heading) -> u8 {
        1 << (heading as u8)
    }

    /// Position of this space.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Whether a wall is drawn on the `heading` side of this space.
    #[must_use]
    pub const fn has_wall(&self, heading: Heading) -> bool {
        self.walls & Self::wall_bit(heading) != 0
    }

    /// Headings with a wall drawn on this space, in clockwise order.
    pub fn walls(&self) -> impl Iterator<Item = Heading> + '_ {
        Heading::ALL.into_iter().filter(|h| self.has_wall(*h))
    }

    /// Field actions on this space, in the order they fire.
    #[must_use]
    pub fn actions(&self) -> &[FieldAction] {
        &self.actions
    }

    /// Heading of the first conveyor belt on this space.
    #[must_use]
    pub fn conveyor_belt(&self) -> Option<Heading> {
        self.actions.iter().find_map(|action| match action {
            FieldAction::ConveyorBelt { heading } => Some(*heading),
            FieldAction::Checkpoint { .. } => None,
        })
    }

    /// Sequence number of the first checkpoint on this space.
    #[must_use]
    pub fn checkpoint(&self) -> Option<u32> {
        self.actions.iter().find_map(|action| match action {
            FieldAction::Checkpoint { sequence } => Some(*sequence),
            FieldAction::ConveyorBelt { .. } => None,
        })
    }

    /// Player standing on this space.
    #[must_use]
    pub const fn occupant(&self) -> Option<PlayerId> {
        self.occupant
    }
}

/// The game board: grid, players and game-loop bookkeeping.
///
/// Walls, field actions and the checkpoint count are meant to be set before
/// the first programming phase; the board does not police this.
///
/// Play-time changes are recorded as [`BoardEvent`]s and kept until
/// [`Board::take_events`] drains them. A caller that never drains them keeps
/// every event of the game in memory.
#[derive(Debug, Clone)]
pub struct Board {
    width: u16,
    height: u16,
    name: String,
    spaces: Vec<Space>,
    players: Vec<Player>,
    game_id: Option<u32>,
    current: Option<PlayerId>,
    phase: Phase,
    step: usize,
    step_mode: bool,
    counter: u32,
    checkpoint_count: u32,
    events: Vec<BoardEvent>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidDimensions`] if width or height is zero.
    pub fn new(width: u16, height: u16, name: impl Into<String>) -> SetupResult<Self> {
        if width == 0 || height == 0 {
            return Err(SetupError::InvalidDimensions { width, height });
        }

        let spaces = (0..height)
            .flat_map(|y| (0..width).map(move |x| Space::new(Coord::new(x, y))))
            .collect();

        Ok(Self {
            width,
            height,
            name: name.into(),
            spaces,
            players: Vec::new(),
            game_id: None,
            current: None,
            phase: Phase::Initialisation,
            step: 0,
            step_mode: false,
            counter: 1,
            checkpoint_count: 0,
            events: Vec::new(),
        })
    }

    /// Width of the board in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the board in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Name of the board layout.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Game id, if one was assigned.
    #[must_use]
    pub const fn game_id(&self) -> Option<u32> {
        self.game_id
    }

    /// Assign the game id.
    ///
    /// Assigning the id the board already has is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::GameIdAlreadySet`] if a different id was
    /// assigned before.
    pub fn set_game_id(&mut self, game_id: u32) -> SetupResult<()> {
        match self.game_id {
            None => {
                self.game_id = Some(game_id);
                self.notify(BoardEvent::GameIdAssigned(game_id));
                Ok(())
            }
            Some(current) if current == game_id => Ok(()),
            Some(current) => Err(SetupError::GameIdAlreadySet {
                current,
                requested: game_id,
            }),
        }
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Space at `coord`, or `None` outside the board.
    #[must_use]
    pub fn space(&self, coord: Coord) -> Option<&Space> {
        self.index(coord).map(|idx| &self.spaces[idx])
    }

    fn space_mut(&mut self, coord: Coord) -> Option<&mut Space> {
        self.index(coord).map(|idx| &mut self.spaces[idx])
    }

    /// All spaces in row-major order.
    #[must_use]
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    /// Draw a wall on the `heading` side of the space at `coord`.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn add_wall(&mut self, coord: Coord, heading: Heading) -> bool {
        match self.space_mut(coord) {
            Some(space) => {
                space.walls |= Space::wall_bit(heading);
                true
            }
            None => false,
        }
    }

    /// Append a field action to the space at `coord`.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn add_action(&mut self, coord: Coord, action: FieldAction) -> bool {
        match self.space_mut(coord) {
            Some(space) => {
                space.actions.push(action);
                true
            }
            None => false,
        }
    }

    /// The cell one step from `coord` in `heading`, wrapping around the edges.
    ///
    /// Returns `None` when a wall on either side of the boundary blocks the
    /// step, or when `coord` is not on the board. Callers cannot tell the two
    /// cases apart.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn neighbour(&self, coord: Coord, heading: Heading) -> Option<Coord> {
        let source = self.space(coord)?;
        let (dx, dy) = heading.delta();
        let width = i32::from(self.width);
        let height = i32::from(self.height);
        // rem_euclid keeps both components in 0..width / 0..height
        let next = Coord::new(
            (i32::from(coord.x) + dx).rem_euclid(width) as u16,
            (i32::from(coord.y) + dy).rem_euclid(height) as u16,
        );
        let target = self.space(next)?;

        if source.has_wall(heading) || target.has_wall(heading.opposite()) {
            return None;
        }
        Some(next)
    }

    /// Player standing at `coord`.
    #[must_use]
    pub fn occupant(&self, coord: Coord) -> Option<PlayerId> {
        self.space(coord).and_then(Space::occupant)
    }

    /// All players in board order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    /// Add a player at the end of the board order.
    ///
    /// The player starts unplaced; use [`Board::place_player`] to put it on a
    /// space.
    pub fn add_player(&mut self, mut player: Player) -> PlayerId {
        player.set_space(None);
        let id = self.players.len();
        self.players.push(player);
        self.notify(BoardEvent::PlayerAdded(id));
        id
    }

    /// Move `player` to `coord` (or off the board with `None`), keeping the
    /// player and both affected spaces consistent.
    ///
    /// Returns `false` without changing anything if the player does not
    /// exist, the coordinate is off the board, or another player already
    /// occupies the target.
    pub fn place_player(&mut self, player: PlayerId, coord: Option<Coord>) -> bool {
        let Some(from) = self.player(player).map(Player::space) else {
            return false;
        };
        if from == coord {
            return true;
        }
        if let Some(to) = coord {
            match self.space(to) {
                None => return false,
                Some(space) if space.occupant.is_some_and(|p| p != player) => return false,
                Some(_) => {}
            }
        }

        if let Some(old) = from.and_then(|c| self.space_mut(c)) {
            old.occupant = None;
        }
        if let Some(new) = coord.and_then(|c| self.space_mut(c)) {
            new.occupant = Some(player);
        }
        if let Some(p) = self.player_mut(player) {
            p.set_space(coord);
        }
        self.notify(BoardEvent::PlayerMoved {
            player,
            from,
            to: coord,
        });
        true
    }

    /// Turn `player` to face `heading`.
    ///
    /// Returns `false` if the player does not exist.
    pub fn set_heading(&mut self, player: PlayerId, heading: Heading) -> bool {
        let Some(p) = self.player_mut(player) else {
            return false;
        };
        if p.heading() != heading {
            p.set_heading(heading);
            self.notify(BoardEvent::HeadingChanged { player, heading });
        }
        true
    }

    /// Put `card` (or nothing) into one of `player`'s slots.
    ///
    /// Returns `false` if the player or slot does not exist.
    pub fn set_card(&mut self, player: PlayerId, slot: CardSlot, card: Option<CommandCard>) -> bool {
        let Some(field) = self.player_mut(player).and_then(|p| p.field_mut(slot)) else {
            return false;
        };
        field.card = card;
        self.notify(BoardEvent::CardsChanged(player));
        true
    }

    pub(crate) fn set_register_visibility(&mut self, register: usize, visible: bool) {
        if register >= REGISTER_COUNT {
            return;
        }
        for id in 0..self.players.len() {
            self.players[id].program_mut()[register].visible = visible;
            self.notify(BoardEvent::CardsChanged(id));
        }
    }

    /// Current game phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if phase != self.phase {
            self.phase = phase;
            self.notify(BoardEvent::PhaseChanged(phase));
        }
    }

    /// Active register index.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    pub(crate) fn set_step(&mut self, step: usize) {
        if step != self.step {
            self.step = step;
            self.notify(BoardEvent::StepChanged(step));
        }
    }

    /// Whether execution stops after every register step.
    #[must_use]
    pub const fn step_mode(&self) -> bool {
        self.step_mode
    }

    pub(crate) fn set_step_mode(&mut self, step_mode: bool) {
        if step_mode != self.step_mode {
            self.step_mode = step_mode;
            self.notify(BoardEvent::StepModeChanged(step_mode));
        }
    }

    /// Player whose register executes next.
    #[must_use]
    pub const fn current_player(&self) -> Option<PlayerId> {
        self.current
    }

    pub(crate) fn set_current_player(&mut self, player: Option<PlayerId>) {
        let player = player.filter(|&id| id < self.players.len());
        if player != self.current {
            self.current = player;
            self.notify(BoardEvent::CurrentPlayerChanged(player));
        }
    }

    /// Round number, starting at 1.
    #[must_use]
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    pub(crate) fn set_counter(&mut self, counter: u32) {
        self.counter = counter;
        self.notify(BoardEvent::CounterChanged(counter));
    }

    /// Number of checkpoints a player must visit to win.
    #[must_use]
    pub const fn checkpoint_count(&self) -> u32 {
        self.checkpoint_count
    }

    /// Set the number of checkpoints a player must visit to win.
    pub fn set_checkpoint_count(&mut self, count: u32) {
        self.checkpoint_count = count;
    }

    /// One-line summary of the current player's progress.
    ///
    /// Returns `None` when there is no current player.
    #[must_use]
    pub fn status_message(&self) -> Option<String> {
        let player = self.player(self.current?)?;
        Some(format!(
            "{}, your next checkpoint is {} | Current round: {} | Current register: {} | Phase: {}",
            player.name,
            player.next_checkpoint(),
            self.counter,
            self.step,
            self.phase
        ))
    }

    /// Events recorded since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded and not yet taken.
    #[must_use]
    pub fn pending_events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub(crate) fn notify(&mut self, event: BoardEvent) {
        trace!(?event, "board changed");
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Command;

    fn board_with_players(n: usize) -> Board {
        let mut board = Board::new(8, 8, "test").unwrap();
        for i in 0..n {
            let id = board.add_player(Player::new(format!("Player {i}"), "red"));
            let c = u16::try_from(i).unwrap();
            assert!(board.place_player(id, Some(Coord::new(c, c))));
        }
        board
    }

    #[test]
    fn test_board_creation() {
        let board = Board::new(15, 8, "wide").unwrap();
        assert_eq!(board.width(), 15);
        assert_eq!(board.height(), 8);
        assert_eq!(board.spaces().len(), 120);
        assert_eq!(board.phase(), Phase::Initialisation);
        assert_eq!(board.counter(), 1);
        assert_eq!(board.step(), 0);
        assert_eq!(board.space(Coord::new(14, 7)).unwrap().coord(), Coord::new(14, 7));
        assert!(board.space(Coord::new(15, 0)).is_none());
    }

    #[test]
    fn test_board_zero_size() {
        assert_eq!(
            Board::new(0, 8, "x").unwrap_err(),
            SetupError::InvalidDimensions { width: 0, height: 8 }
        );
        assert!(Board::new(8, 0, "x").is_err());
    }

    #[test]
    fn test_neighbour_wraps_around() {
        let board = Board::new(8, 8, "test").unwrap();
        assert_eq!(board.neighbour(Coord::new(0, 0), Heading::North), Some(Coord::new(0, 7)));
        assert_eq!(board.neighbour(Coord::new(0, 0), Heading::West), Some(Coord::new(7, 0)));
        assert_eq!(board.neighbour(Coord::new(7, 7), Heading::South), Some(Coord::new(7, 0)));
        assert_eq!(board.neighbour(Coord::new(7, 7), Heading::East), Some(Coord::new(0, 7)));
        assert_eq!(board.neighbour(Coord::new(3, 3), Heading::East), Some(Coord::new(4, 3)));
    }

    #[test]
    fn test_neighbour_blocked_by_own_wall() {
        let mut board = Board::new(8, 8, "test").unwrap();
        board.add_wall(Coord::new(5, 5), Heading::South);
        assert_eq!(board.neighbour(Coord::new(5, 5), Heading::South), None);
        // The wall is symmetric: it also blocks from the other side.
        assert_eq!(board.neighbour(Coord::new(5, 6), Heading::North), None);
        assert_eq!(board.neighbour(Coord::new(5, 5), Heading::North), Some(Coord::new(5, 4)));
    }

    #[test]
    fn test_neighbour_blocked_by_far_wall() {
        let mut board = Board::new(8, 8, "test").unwrap();
        board.add_wall(Coord::new(6, 6), Heading::North);
        assert_eq!(board.neighbour(Coord::new(6, 5), Heading::South), None);
    }

    #[test]
    fn test_neighbour_off_board() {
        let board = Board::new(8, 8, "test").unwrap();
        assert_eq!(board.neighbour(Coord::new(8, 0), Heading::East), None);
    }

    #[test]
    fn test_place_player_keeps_space_consistent() {
        let mut board = board_with_players(2);
        assert_eq!(board.occupant(Coord::new(0, 0)), Some(0));
        assert!(board.place_player(0, Some(Coord::new(0, 4))));
        assert_eq!(board.occupant(Coord::new(0, 0)), None);
        assert_eq!(board.occupant(Coord::new(0, 4)), Some(0));
        assert_eq!(board.player(0).unwrap().space(), Some(Coord::new(0, 4)));

        assert!(board.place_player(0, None));
        assert_eq!(board.occupant(Coord::new(0, 4)), None);
        assert_eq!(board.player(0).unwrap().space(), None);
    }

    #[test]
    fn test_place_player_refuses_occupied_space() {
        let mut board = board_with_players(2);
        assert!(!board.place_player(0, Some(Coord::new(1, 1))));
        assert_eq!(board.occupant(Coord::new(0, 0)), Some(0));
        assert_eq!(board.occupant(Coord::new(1, 1)), Some(1));
        assert!(!board.place_player(5, Some(Coord::new(2, 2))));
        assert!(!board.place_player(0, Some(Coord::new(9, 9))));
    }

    #[test]
    fn test_game_id_assignment() {
        let mut board = Board::new(8, 8, "test").unwrap();
        assert_eq!(board.game_id(), None);
        board.set_game_id(12).unwrap();
        board.set_game_id(12).unwrap();
        assert_eq!(
            board.set_game_id(13),
            Err(SetupError::GameIdAlreadySet {
                current: 12,
                requested: 13
            })
        );
        assert_eq!(board.game_id(), Some(12));
    }

    #[test]
    fn test_space_helpers() {
        let mut board = Board::new(8, 8, "test").unwrap();
        let c = Coord::new(2, 3);
        board.add_action(c, FieldAction::checkpoint(2));
        board.add_action(c, FieldAction::conveyor_belt(Heading::West));
        board.add_wall(c, Heading::East);
        let space = board.space(c).unwrap();
        assert_eq!(space.conveyor_belt(), Some(Heading::West));
        assert_eq!(space.checkpoint(), Some(2));
        assert_eq!(space.actions().len(), 2);
        assert_eq!(space.walls().collect::<Vec<_>>(), vec![Heading::East]);
    }

    #[test]
    fn test_events_are_recorded_in_order() {
        let mut board = board_with_players(1);
        board.take_events();
        board.set_heading(0, Heading::East);
        board.set_heading(0, Heading::East);
        board.place_player(0, Some(Coord::new(1, 0)));
        assert_eq!(
            board.take_events(),
            vec![
                BoardEvent::HeadingChanged {
                    player: 0,
                    heading: Heading::East
                },
                BoardEvent::PlayerMoved {
                    player: 0,
                    from: Some(Coord::new(0, 0)),
                    to: Some(Coord::new(1, 0)),
                },
            ]
        );
        assert!(board.pending_events().is_empty());
    }

    #[test]
    fn test_setup_calls_emit_no_events() {
        let mut board = board_with_players(1);
        board.take_events();
        board.add_wall(Coord::new(2, 2), Heading::North);
        board.add_action(Coord::new(2, 2), FieldAction::checkpoint(1));
        board.set_checkpoint_count(1);
        assert!(board.pending_events().is_empty());
    }

    #[test]
    fn test_set_card() {
        let mut board = board_with_players(1);
        assert!(board.set_card(0, CardSlot::Program(4), Some(CommandCard::new(Command::Again))));
        assert_eq!(
            board.player(0).unwrap().program_field(4).unwrap().command(),
            Some(Command::Again)
        );
        assert!(!board.set_card(0, CardSlot::Program(5), None));
        assert!(!board.set_card(3, CardSlot::Hand(0), None));
    }

    #[test]
    fn test_status_message() {
        let mut board = board_with_players(2);
        assert_eq!(board.status_message(), None);
        board.set_current_player(Some(1));
        assert_eq!(
            board.status_message().unwrap(),
            "Player 1, your next checkpoint is 1 | Current round: 1 | Current register: 0 | Phase: INITIALISATION"
        );
    }
}
