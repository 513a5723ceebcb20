//! Phase state machine and robot movement.
//!
//! One round runs as: programming, then one activation step per player per
//! register, then a field-action sweep over every occupied space, then the
//! next round's programming phase. A `RIGHT_OR_LEFT` card suspends the loop in
//! [`Phase::PlayerInteraction`] until [`GameController::turn_right_or_left`]
//! resumes it.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::game::invariants::assert_invariants;
use crate::game::{
    ActionOutcome, Board, BoardEvent, CardSlot, Command, CommandCard, CommandCardField, Coord,
    Heading, Phase, Player, PlayerId, HAND_SIZE, REGISTER_COUNT,
};

/// Receives the announcement that a player has won.
pub trait WinnerSink {
    /// Called once when `player` is declared the winner.
    fn announce_winner(&mut self, player: PlayerId, name: &str);
}

/// Default sink: logs the winner.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWinner;

impl WinnerSink for LogWinner {
    fn announce_winner(&mut self, player: PlayerId, name: &str) {
        info!(player, name, "{name} is the winner!");
    }
}

/// The player's answer to a `RIGHT_OR_LEFT` card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnChoice {
    /// Quarter turn left.
    Left,
    /// Quarter turn right.
    Right,
}

impl std::str::FromStr for TurnChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Left" | "left" => Ok(TurnChoice::Left),
            "Right" | "right" => Ok(TurnChoice::Right),
            other => Err(format!("expected \"Left\" or \"Right\", got {other:?}")),
        }
    }
}

/// Outcome of one end-of-round field-action sweep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Retry passes run after the initial pass.
    pub retry_passes: u32,
    /// Players whose belt could still not move them when the sweep converged.
    pub still_blocked: Vec<PlayerId>,
}

/// Raised inside the push chain to unwind it. Never escapes the controller.
#[derive(Debug, Clone, Copy, Error)]
#[error("player {player} cannot be pushed from {from} towards {heading}")]
struct ImpossibleMove {
    player: PlayerId,
    from: Coord,
    heading: Heading,
}

/// Drives a [`Board`] through the game loop.
pub struct GameController {
    board: Board,
    rng: StdRng,
    winner_sink: Box<dyn WinnerSink>,
    winner: Option<PlayerId>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("board", &self.board)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Create a controller dealing cards from an entropy-seeded generator.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self::with_rng(board, StdRng::from_entropy())
    }

    /// Create a controller whose card deals are reproducible from `seed`.
    #[must_use]
    pub fn with_seed(board: Board, seed: u64) -> Self {
        Self::with_rng(board, StdRng::seed_from_u64(seed))
    }

    fn with_rng(board: Board, rng: StdRng) -> Self {
        Self {
            board,
            rng,
            winner_sink: Box::new(LogWinner),
            winner: None,
        }
    }

    /// Replace the sink that is told about the winner.
    #[must_use]
    pub fn with_winner_sink(mut self, sink: Box<dyn WinnerSink>) -> Self {
        self.winner_sink = sink;
        self
    }

    /// The board being driven.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access for setup and for draining events.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The declared winner, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    // ---- phases -----------------------------------------------------------

    /// Clear every register, deal a fresh hand to every player and enter the
    /// programming phase.
    pub fn start_programming_phase(&mut self) {
        self.board.set_phase(Phase::Programming);
        self.board.set_current_player(Some(0));
        self.board.set_step(0);

        for id in 0..self.board.player_count() {
            let hand: [CommandCardField; HAND_SIZE] = std::array::from_fn(|_| CommandCardField {
                card: Some(CommandCard::random(&mut self.rng)),
                visible: true,
            });
            if let Some(player) = self.board.player_mut(id) {
                *player.program_mut() = [CommandCardField::empty(); REGISTER_COUNT];
                *player.cards_mut() = hand;
            }
            self.board.notify(BoardEvent::CardsChanged(id));
        }
        debug!(
            round = self.board.counter(),
            pending_events = self.board.pending_events().len(),
            "programming phase started"
        );
    }

    /// Hide all registers except the first and enter the activation phase.
    pub fn finish_programming_phase(&mut self) {
        for register in 0..REGISTER_COUNT {
            self.board.set_register_visibility(register, false);
        }
        self.board.set_register_visibility(0, true);
        self.board.set_phase(Phase::Activation);
        self.board.set_current_player(Some(0));
        self.board.set_step(0);
        debug!(round = self.board.counter(), "activation phase started");
    }

    /// Run every remaining register step until the activation phase ends.
    ///
    /// # Panics
    ///
    /// Panics if the board is not in the activation phase.
    pub fn execute_programs(&mut self) {
        self.board.set_step_mode(false);
        self.continue_programs();
    }

    /// Run a single player's register step.
    ///
    /// # Panics
    ///
    /// Panics if the board is not in the activation phase.
    pub fn execute_step(&mut self) {
        self.board.set_step_mode(true);
        self.continue_programs();
    }

    fn continue_programs(&mut self) {
        loop {
            self.execute_next_step();
            if self.board.phase() != Phase::Activation || self.board.step_mode() {
                break;
            }
        }
    }

    fn execute_next_step(&mut self) {
        assert_eq!(
            self.board.phase(),
            Phase::Activation,
            "register steps only execute in the activation phase"
        );
        let step = self.board.step();
        assert!(step < REGISTER_COUNT, "register index {step} out of range");
        let Some(current) = self.board.current_player() else {
            panic!("activation phase without a current player");
        };

        let command = self
            .board
            .player(current)
            .and_then(|p| p.program_field(step))
            .and_then(CommandCardField::command);
        if let Some(command) = command {
            self.execute_command(current, command);
        }

        assert_invariants(&self.board);

        // A RIGHT_OR_LEFT (directly or through AGAIN) waits for the player.
        if self.board.phase() == Phase::PlayerInteraction {
            debug!(player = current, step, "waiting for player interaction");
            return;
        }
        self.continue_next_step(current);
    }

    fn continue_next_step(&mut self, player: PlayerId) {
        let next_player = player + 1;
        if next_player < self.board.player_count() {
            self.board.set_current_player(Some(next_player));
            return;
        }

        let step = self.board.step() + 1;
        if step < REGISTER_COUNT {
            self.board.set_register_visibility(step, true);
            self.board.set_step(step);
            self.board.set_current_player(Some(0));
            return;
        }

        let report = self.execute_field_actions();
        debug!(
            round = self.board.counter(),
            retry_passes = report.retry_passes,
            blocked = report.still_blocked.len(),
            "field actions done"
        );
        if self.board.phase() != Phase::Finished {
            self.board.set_counter(self.board.counter() + 1);
            self.start_programming_phase();
        }
    }

    fn execute_command(&mut self, player: PlayerId, command: Command) {
        trace!(player, command = command.display_name(), "execute");
        if command != Command::Again
            && let Some(p) = self.board.player_mut(player)
        {
            p.set_last_command(Some(command));
        }
        match command {
            Command::Forward => self.move_forward(player),
            Command::FastForward => self.move_fast_forward(player),
            Command::FastFastForward => self.move_fast_fast_forward(player),
            Command::Backward => self.backward(player),
            Command::Right => self.turn_right(player),
            Command::Left => self.turn_left(player),
            Command::UTurn => self.u_turn(player),
            Command::RightOrLeft => self.board.set_phase(Phase::PlayerInteraction),
            Command::Again => self.again(player),
        }
    }

    // ---- commands ---------------------------------------------------------

    /// Push-move `player` one cell in the direction it faces.
    pub fn move_forward(&mut self, player: PlayerId) {
        if let Some(heading) = self.board.player(player).map(Player::heading) {
            self.push_move(player, heading);
        }
    }

    /// Two independent forward moves.
    pub fn move_fast_forward(&mut self, player: PlayerId) {
        self.move_forward(player);
        self.move_forward(player);
    }

    /// Three independent forward moves.
    pub fn move_fast_fast_forward(&mut self, player: PlayerId) {
        self.move_forward(player);
        self.move_forward(player);
        self.move_forward(player);
    }

    /// Push-move `player` one cell backwards without turning.
    pub fn backward(&mut self, player: PlayerId) {
        if let Some(heading) = self.board.player(player).map(Player::heading) {
            self.push_move(player, heading.opposite());
        }
    }

    /// Quarter turn right.
    pub fn turn_right(&mut self, player: PlayerId) {
        self.rotate(player, Heading::next);
    }

    /// Quarter turn left.
    pub fn turn_left(&mut self, player: PlayerId) {
        self.rotate(player, Heading::prev);
    }

    /// Half turn.
    pub fn u_turn(&mut self, player: PlayerId) {
        self.rotate(player, Heading::opposite);
    }

    fn rotate(&mut self, player: PlayerId, turn: fn(Heading) -> Heading) {
        if let Some(heading) = self.board.player(player).map(Player::heading) {
            self.board.set_heading(player, turn(heading));
        }
    }

    /// Repeat the player's last command. Does nothing if there is none.
    pub fn again(&mut self, player: PlayerId) {
        let Some(last) = self.board.player(player).and_then(Player::last_command) else {
            return;
        };
        // `last` is never AGAIN: execute_command does not record it.
        self.execute_command(player, last);
    }

    /// Resolve a pending `RIGHT_OR_LEFT` card for the current player and
    /// resume execution.
    ///
    /// In run-to-completion mode execution continues until the activation
    /// phase ends; in step mode it stops after advancing to the next player.
    /// Returns `false` and does nothing if no interaction is pending for
    /// `player`.
    pub fn turn_right_or_left(&mut self, player: PlayerId, choice: TurnChoice) -> bool {
        if self.board.phase() != Phase::PlayerInteraction
            || self.board.current_player() != Some(player)
        {
            return false;
        }
        match choice {
            TurnChoice::Right => self.turn_right(player),
            TurnChoice::Left => self.turn_left(player),
        }
        self.board.set_phase(Phase::Activation);
        self.continue_next_step(player);
        if !self.board.step_mode() && self.board.phase() == Phase::Activation {
            self.continue_programs();
        }
        true
    }

    /// Move a card from `source` to `target` in `player`'s slots.
    ///
    /// Only succeeds when `source` holds a card and `target` is empty.
    pub fn move_cards(&mut self, player: PlayerId, source: CardSlot, target: CardSlot) -> bool {
        let Some(p) = self.board.player(player) else {
            return false;
        };
        let (Some(from), Some(to)) = (p.field(source), p.field(target)) else {
            return false;
        };
        let (Some(card), None) = (from.card, to.card) else {
            return false;
        };
        self.board.set_card(player, target, Some(card)) && self.board.set_card(player, source, None)
    }

    // ---- movement ---------------------------------------------------------

    fn push_move(&mut self, player: PlayerId, heading: Heading) {
        let Some(from) = self.board.player(player).and_then(Player::space) else {
            return;
        };
        let Some(target) = self.board.neighbour(from, heading) else {
            return;
        };
        if let Err(err) = self.move_to_space(player, player, target, heading) {
            trace!(%err, "push chain blocked");
        }
    }

    /// Move `pusher` onto `space`, first pushing any occupant one further
    /// cell in `heading`. Either the whole chain shifts or nobody moves.
    fn move_to_space(
        &mut self,
        origin: PlayerId,
        pusher: PlayerId,
        space: Coord,
        heading: Heading,
    ) -> Result<(), ImpossibleMove> {
        if let Some(pushed) = self.board.occupant(space) {
            if pushed == pusher {
                // One-cell-wide ring: the neighbour is the pusher's own cell.
                return Ok(());
            }
            let blocked = ImpossibleMove {
                player: pushed,
                from: space,
                heading,
            };
            if pushed == origin {
                // The chain wrapped all the way around the torus.
                return Err(blocked);
            }
            let next = self.board.neighbour(space, heading).ok_or(blocked)?;
            self.move_to_space(origin, pushed, next, heading)?;
            debug_assert_eq!(self.board.occupant(space), None);
        }
        let placed = self.board.place_player(pusher, Some(space));
        debug_assert!(placed);
        Ok(())
    }

    // ---- field actions ----------------------------------------------------

    /// Apply every space's field actions to its occupant, then retry blocked
    /// belts until the set of blocked players stops changing.
    ///
    /// This runs automatically after the last register of a round; it is
    /// public so a caller can drive a sweep directly.
    pub fn execute_field_actions(&mut self) -> SweepReport {
        let mut queue: Vec<PlayerId> = Vec::new();
        for player in 0..self.board.player_count() {
            self.apply_actions_for(player, &mut queue);
        }

        let mut snapshot: Vec<PlayerId> = Vec::new();
        let mut report = SweepReport::default();
        while !queue.is_empty() {
            if same_players(&queue, &snapshot) {
                break;
            }
            snapshot = std::mem::take(&mut queue);
            report.retry_passes += 1;
            for &player in snapshot.iter().rev() {
                self.apply_actions_for(player, &mut queue);
            }
        }

        assert_invariants(&self.board);

        queue.sort_unstable();
        queue.dedup();
        report.still_blocked = queue;
        report
    }

    fn apply_actions_for(&mut self, player: PlayerId, retry: &mut Vec<PlayerId>) {
        let Some(coord) = self.board.player(player).and_then(Player::space) else {
            return;
        };
        let actions = self
            .board
            .space(coord)
            .map(|space| space.actions().to_vec())
            .unwrap_or_default();

        for action in actions {
            if self.board.occupant(coord) != Some(player) {
                // Carried off this space by an earlier action.
                break;
            }
            match action.apply(&mut self.board, coord) {
                ActionOutcome::Blocked => retry.push(player),
                ActionOutcome::CheckpointReached => {
                    if self.is_player_a_winner(player) && self.board.phase() != Phase::Finished {
                        self.start_winning(player);
                    }
                }
                ActionOutcome::Moved | ActionOutcome::Idle => {}
            }
        }
    }

    // ---- winning ----------------------------------------------------------

    /// Whether `player` has visited every checkpoint.
    #[must_use]
    pub fn is_player_a_winner(&self, player: PlayerId) -> bool {
        self.board
            .player(player)
            .is_some_and(|p| p.next_checkpoint() > self.board.checkpoint_count())
    }

    /// Declare `player` the winner and finish the game.
    pub fn start_winning(&mut self, player: PlayerId) {
        let Some(name) = self.board.player(player).map(|p| p.name.clone()) else {
            return;
        };
        self.board.set_phase(Phase::Finished);
        self.winner = Some(player);
        self.winner_sink.announce_winner(player, &name);
    }
}

fn same_players(a: &[PlayerId], b: &[PlayerId]) -> bool {
    let a: HashSet<_> = a.iter().collect();
    let b: HashSet<_> = b.iter().collect();
    a == b
}
