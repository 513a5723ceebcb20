//! Board invariants - sanity checks that detect engine bugs.
//!
//! These should never trigger in a correctly implemented game. They are not
//! rule checks; a rule violation is a silent no-op, never a broken board.

use std::collections::HashSet;

use crate::game::{Board, Phase, Player, REGISTER_COUNT};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Every occupied space points at a player that points back.
    for space in board.spaces() {
        if let Some(id) = space.occupant() {
            let back = board.player(id).and_then(Player::space);
            if back != Some(space.coord()) {
                violations.push(InvariantViolation {
                    message: format!(
                        "Space {} holds player {id} but that player is at {back:?}",
                        space.coord()
                    ),
                });
            }
        }
    }

    // Every placed player is the occupant of its space, and no two share one.
    let mut seen = HashSet::new();
    for (id, player) in board.players().iter().enumerate() {
        let Some(coord) = player.space() else {
            continue;
        };
        if !seen.insert(coord) {
            violations.push(InvariantViolation {
                message: format!("More than one player on {coord}"),
            });
        }
        if board.occupant(coord) != Some(id) {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {id} is at {coord} but the space holds {:?}",
                    board.occupant(coord)
                ),
            });
        }
    }

    if board.phase() == Phase::Activation && board.step() >= REGISTER_COUNT {
        violations.push(InvariantViolation {
            message: format!(
                "Step {} outside 0..{REGISTER_COUNT} during activation",
                board.step()
            ),
        });
    }

    if let Some(current) = board.current_player()
        && current >= board.player_count()
    {
        violations.push(InvariantViolation {
            message: format!("Current player {current} is not on the board"),
        });
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(board: &Board) {
    let violations = check_invariants(board);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_board: &Board) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Coord;

    fn create_valid_board() -> Board {
        let mut board = Board::new(8, 8, "test").unwrap();
        for i in 0..3u16 {
            let id = board.add_player(Player::new(format!("Player {i}"), "red"));
            board.place_player(id, Some(Coord::new(i, 0)));
        }
        board
    }

    #[test]
    fn test_valid_board_passes() {
        let board = create_valid_board();
        assert!(check_invariants(&board).is_empty());
    }

    #[test]
    fn test_unplaced_player_passes() {
        let mut board = create_valid_board();
        board.place_player(1, None);
        assert!(check_invariants(&board).is_empty());
    }

    #[test]
    fn test_broken_back_reference_detected() {
        let mut board = create_valid_board();
        board.player_mut(0).unwrap().set_space(Some(Coord::new(5, 5)));

        let violations = check_invariants(&board);
        assert!(!violations.is_empty());
        assert!(violations[0].message.contains("Space (0,0) holds player 0"));
    }

    #[test]
    fn test_shared_space_detected() {
        let mut board = create_valid_board();
        board.player_mut(1).unwrap().set_space(Some(Coord::new(0, 0)));

        let violations = check_invariants(&board);
        assert!(violations.iter().any(|v| v.message.contains("More than one player")));
    }

    #[test]
    fn test_step_out_of_range_detected() {
        let mut board = create_valid_board();
        board.set_phase(Phase::Activation);
        board.set_step(REGISTER_COUNT);

        let violations = check_invariants(&board);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("during activation"));
    }
}
