//! Per-space effects applied to whoever stands on the space.

use tracing::trace;

use crate::game::{Board, BoardEvent, Coord, Heading};

/// An effect attached to a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    /// Carries the occupant one cell in `heading`.
    ConveyorBelt {
        /// Direction the belt runs.
        heading: Heading,
    },
    /// Counts towards the occupant's checkpoint progress when visited in order.
    Checkpoint {
        /// 1-based position of this checkpoint in the required sequence.
        sequence: u32,
    },
}

/// What applying a field action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing happened.
    Idle,
    /// A belt carried its occupant onto the target cell.
    Moved,
    /// A belt could not move its occupant this attempt and should be retried.
    Blocked,
    /// The occupant's checkpoint progress advanced.
    CheckpointReached,
}

impl FieldAction {
    /// A conveyor belt running towards `heading`.
    #[must_use]
    pub const fn conveyor_belt(heading: Heading) -> Self {
        FieldAction::ConveyorBelt { heading }
    }

    /// Checkpoint number `sequence`.
    #[must_use]
    pub const fn checkpoint(sequence: u32) -> Self {
        FieldAction::Checkpoint { sequence }
    }

    /// Apply this action to the player standing at `coord`.
    ///
    /// An empty space is left alone.
    pub fn apply(&self, board: &mut Board, coord: Coord) -> ActionOutcome {
        let Some(player) = board.occupant(coord) else {
            return ActionOutcome::Idle;
        };

        match *self {
            FieldAction::ConveyorBelt { heading } => {
                let Some(target) = board.neighbour(coord, heading) else {
                    return ActionOutcome::Idle;
                };
                let contested = conflicting_sources(board, target, heading)
                    .iter()
                    .any(|source| board.occupant(*source).is_some());
                if contested || board.occupant(target).is_some() {
                    trace!(player, %coord, %target, contested, "belt blocked");
                    return ActionOutcome::Blocked;
                }
                board.place_player(player, Some(target));
                ActionOutcome::Moved
            }
            FieldAction::Checkpoint { sequence } => {
                let Some(p) = board.player_mut(player) else {
                    return ActionOutcome::Idle;
                };
                if p.next_checkpoint() != sequence {
                    return ActionOutcome::Idle;
                }
                p.increment_next_checkpoint();
                let next_checkpoint = p.next_checkpoint();
                board.notify(BoardEvent::CheckpointReached {
                    player,
                    next_checkpoint,
                });
                ActionOutcome::CheckpointReached
            }
        }
    }
}

/// Spaces whose belts feed into `target` from a side other than the one a
/// belt running in `heading` arrives from.
///
/// Two belts feeding the same cell would otherwise each shove a different
/// player onto it in the same pass.
#[must_use]
pub fn conflicting_sources(board: &Board, target: Coord, heading: Heading) -> Vec<Coord> {
    Heading::ALL
        .into_iter()
        .filter(|&direction| direction != heading.opposite())
        .filter_map(|direction| {
            let source = board.neighbour(target, direction)?;
            let belt = board.space(source)?.conveyor_belt()?;
            (belt == direction.opposite()).then_some(source)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;

    fn board_with_players(n: usize) -> Board {
        let mut board = Board::new(8, 8, "test").unwrap();
        for i in 0..n {
            let id = board.add_player(Player::new(format!("Player {i}"), "red"));
            let c = u16::try_from(i).unwrap();
            board.place_player(id, Some(Coord::new(c, c)));
        }
        board
    }

    #[test]
    fn test_belt_moves_occupant() {
        let mut board = board_with_players(1);
        let belt = FieldAction::conveyor_belt(Heading::East);
        board.add_action(Coord::new(0, 0), belt);

        assert_eq!(belt.apply(&mut board, Coord::new(0, 0)), ActionOutcome::Moved);
        assert_eq!(board.occupant(Coord::new(0, 0)), None);
        assert_eq!(board.occupant(Coord::new(1, 0)), Some(0));
    }

    #[test]
    fn test_belt_on_empty_space_is_idle() {
        let mut board = board_with_players(1);
        let belt = FieldAction::conveyor_belt(Heading::East);
        assert_eq!(belt.apply(&mut board, Coord::new(4, 4)), ActionOutcome::Idle);
    }

    #[test]
    fn test_belt_into_wall_is_idle() {
        let mut board = board_with_players(1);
        let belt = FieldAction::conveyor_belt(Heading::North);
        board.add_action(Coord::new(0, 0), belt);
        board.add_wall(Coord::new(0, 0), Heading::North);

        assert_eq!(belt.apply(&mut board, Coord::new(0, 0)), ActionOutcome::Idle);
        assert_eq!(board.occupant(Coord::new(0, 0)), Some(0));
    }

    #[test]
    fn test_belt_onto_occupied_target_is_blocked() {
        let mut board = board_with_players(2);
        board.place_player(1, Some(Coord::new(1, 0)));
        let belt = FieldAction::conveyor_belt(Heading::East);
        board.add_action(Coord::new(0, 0), belt);

        assert_eq!(belt.apply(&mut board, Coord::new(0, 0)), ActionOutcome::Blocked);
        assert_eq!(board.occupant(Coord::new(0, 0)), Some(0));
        assert_eq!(board.occupant(Coord::new(1, 0)), Some(1));
    }

    #[test]
    fn test_conflicting_sources() {
        let mut board = Board::new(8, 8, "test").unwrap();
        let target = Coord::new(1, 0);
        assert!(conflicting_sources(&board, target, Heading::East).is_empty());

        board.add_action(Coord::new(0, 0), FieldAction::conveyor_belt(Heading::East));
        // The belt's own cell is never its own conflict.
        assert!(conflicting_sources(&board, target, Heading::East).is_empty());

        board.add_action(Coord::new(1, 1), FieldAction::conveyor_belt(Heading::North));
        assert_eq!(
            conflicting_sources(&board, target, Heading::East),
            vec![Coord::new(1, 1)]
        );

        // A belt beside the target that runs parallel does not conflict.
        board.add_action(Coord::new(2, 0), FieldAction::conveyor_belt(Heading::East));
        assert_eq!(
            conflicting_sources(&board, target, Heading::East),
            vec![Coord::new(1, 1)]
        );
    }

    #[test]
    fn test_contested_belts_hold_both_occupants() {
        let mut board = board_with_players(2);
        let east = FieldAction::conveyor_belt(Heading::East);
        let north = FieldAction::conveyor_belt(Heading::North);
        board.add_action(Coord::new(0, 0), east);
        board.add_action(Coord::new(1, 1), north);

        assert_eq!(east.apply(&mut board, Coord::new(0, 0)), ActionOutcome::Blocked);
        assert_eq!(north.apply(&mut board, Coord::new(1, 1)), ActionOutcome::Blocked);
        assert_eq!(board.occupant(Coord::new(0, 0)), Some(0));
        assert_eq!(board.occupant(Coord::new(1, 1)), Some(1));
        assert_eq!(board.occupant(Coord::new(1, 0)), None);

        // Once the contender is gone the other belt runs.
        board.place_player(0, Some(Coord::new(3, 0)));
        assert_eq!(north.apply(&mut board, Coord::new(1, 1)), ActionOutcome::Moved);
        assert_eq!(board.occupant(Coord::new(1, 0)), Some(1));
    }

    #[test]
    fn test_checkpoint_only_counts_in_order() {
        let mut board = board_with_players(1);
        let first = FieldAction::checkpoint(1);
        let second = FieldAction::checkpoint(2);

        assert_eq!(second.apply(&mut board, Coord::new(0, 0)), ActionOutcome::Idle);
        assert_eq!(board.player(0).unwrap().next_checkpoint(), 1);

        assert_eq!(first.apply(&mut board, Coord::new(0, 0)), ActionOutcome::CheckpointReached);
        assert_eq!(first.apply(&mut board, Coord::new(0, 0)), ActionOutcome::Idle);
        assert_eq!(second.apply(&mut board, Coord::new(0, 0)), ActionOutcome::CheckpointReached);
        assert_eq!(board.player(0).unwrap().next_checkpoint(), 3);
    }
}
