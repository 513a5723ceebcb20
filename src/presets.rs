//! Named board layouts.
//!
//! Presets are plain data: a size, a checkpoint target, start cells for
//! players and a function that draws walls and field actions.

use crate::error::{SetupError, SetupResult};
use crate::game::{Board, Coord, FieldAction, Heading};

/// Name of the empty 8x8 board.
pub const SIMPLE_BOARD: &str = "Simple board";
/// Name of the 15x8 board with a few belts and two checkpoints.
pub const ADVANCED_BOARD: &str = "Advanced board";
/// Name of the 12x8 board covered in conveyor belts.
pub const CONVEYOR_BOARD: &str = "Belts belts belts board";

/// A named board layout.
#[derive(Debug, Clone, Copy)]
pub struct BoardPreset {
    /// Name used to select the preset.
    pub name: &'static str,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
    /// Number of checkpoints a player must visit to win.
    pub checkpoints: u32,
    /// Cells players start on, in seating order.
    pub start_cells: &'static [(u16, u16)],
    setup: fn(&mut Board),
}

impl BoardPreset {
    /// Build a fresh board from this preset.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidDimensions`] for a zero-sized preset.
    pub fn build(&self) -> SetupResult<Board> {
        let mut board = Board::new(self.width, self.height, self.name)?;
        (self.setup)(&mut board);
        board.set_checkpoint_count(self.checkpoints);
        Ok(board)
    }

    /// Maximum number of players this preset seats.
    #[must_use]
    pub const fn max_players(&self) -> usize {
        self.start_cells.len()
    }
}

/// Every registered preset.
pub const PRESETS: &[BoardPreset] = &[
    BoardPreset {
        name: SIMPLE_BOARD,
        width: 8,
        height: 8,
        checkpoints: 0,
        start_cells: &[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5)],
        setup: setup_simple_board,
    },
    BoardPreset {
        name: ADVANCED_BOARD,
        width: 15,
        height: 8,
        checkpoints: 2,
        start_cells: &[(0, 7), (2, 7), (4, 7), (6, 7), (8, 7), (10, 7)],
        setup: setup_advanced_board,
    },
    BoardPreset {
        name: CONVEYOR_BOARD,
        width: 12,
        height: 8,
        checkpoints: 4,
        start_cells: &[(0, 4), (1, 4), (3, 4), (5, 4), (7, 4), (11, 4)],
        setup: setup_conveyor_board,
    },
];

/// Names of all presets, in registration order.
pub fn board_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|preset| preset.name)
}

/// Look up a preset by name.
///
/// # Errors
///
/// Returns [`SetupError::UnknownBoard`] if no preset has that name.
pub fn preset(name: &str) -> SetupResult<&'static BoardPreset> {
    PRESETS
        .iter()
        .find(|preset| preset.name == name)
        .ok_or_else(|| SetupError::UnknownBoard(name.to_string()))
}

/// Build the board registered under `name`.
///
/// # Errors
///
/// Returns [`SetupError::UnknownBoard`] if no preset has that name.
pub fn create_board(name: &str) -> SetupResult<Board> {
    preset(name)?.build()
}

fn setup_simple_board(_board: &mut Board) {}

fn setup_advanced_board(board: &mut Board) {
    let belts = [
        ((0, 0), Heading::South),
        ((1, 0), Heading::North),
        ((1, 1), Heading::West),
        ((5, 5), Heading::South),
    ];
    for ((x, y), wall) in belts {
        let coord = Coord::new(x, y);
        board.add_wall(coord, wall);
        board.add_action(coord, FieldAction::conveyor_belt(Heading::West));
    }
    board.add_action(Coord::new(6, 5), FieldAction::conveyor_belt(Heading::West));
    board.add_action(Coord::new(7, 5), FieldAction::checkpoint(1));
    board.add_action(Coord::new(4, 4), FieldAction::checkpoint(2));
}

fn setup_conveyor_board(board: &mut Board) {
    let (width, height) = (board.width(), board.height());
    for x in 0..width {
        for y in 0..height {
            let coord = Coord::new(x, y);
            if y < 3 && (x, y) != (5, 0) {
                board.add_action(coord, FieldAction::conveyor_belt(Heading::North));
            }
            if y == 0 {
                board.add_wall(coord, Heading::North);
            }
            if y > 4 && (x, y) != (6, 7) {
                board.add_action(coord, FieldAction::conveyor_belt(Heading::South));
            }
            if y == height - 1 {
                board.add_wall(coord, Heading::South);
            }
        }
    }

    board.add_action(Coord::new(9, 4), FieldAction::checkpoint(2));
    board.add_action(Coord::new(5, 0), FieldAction::checkpoint(3));
    board.add_action(Coord::new(6, 7), FieldAction::checkpoint(1));
    board.add_action(Coord::new(2, 3), FieldAction::checkpoint(4));

    for (x, y, wall) in [
        (2, 3, Heading::East),
        (2, 4, Heading::East),
        (9, 3, Heading::West),
        (9, 4, Heading::West),
    ] {
        board.add_wall(Coord::new(x, y), wall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_build() {
        for preset in PRESETS {
            let board = preset.build().unwrap();
            assert_eq!(board.name(), preset.name);
            assert_eq!(board.checkpoint_count(), preset.checkpoints);
            for &(x, y) in preset.start_cells {
                let space = board.space(Coord::new(x, y)).unwrap();
                assert!(space.occupant().is_none());
            }
        }
    }

    #[test]
    fn test_start_cells_are_distinct() {
        for preset in PRESETS {
            let mut cells = preset.start_cells.to_vec();
            cells.sort_unstable();
            cells.dedup();
            assert_eq!(cells.len(), preset.start_cells.len(), "{}", preset.name);
        }
    }

    #[test]
    fn test_unknown_board() {
        assert_eq!(
            create_board("Moon base").unwrap_err(),
            SetupError::UnknownBoard("Moon base".to_string())
        );
    }

    #[test]
    fn test_board_names() {
        let names: Vec<_> = board_names().collect();
        assert_eq!(names, vec![SIMPLE_BOARD, ADVANCED_BOARD, CONVEYOR_BOARD]);
    }

    #[test]
    fn test_conveyor_board_layout() {
        let board = create_board(CONVEYOR_BOARD).unwrap();
        assert_eq!((board.width(), board.height()), (12, 8));
        let top = board.space(Coord::new(0, 0)).unwrap();
        assert_eq!(top.conveyor_belt(), Some(Heading::North));
        assert!(top.has_wall(Heading::North));
        assert_eq!(board.space(Coord::new(5, 0)).unwrap().checkpoint(), Some(3));
        assert_eq!(board.space(Coord::new(5, 0)).unwrap().conveyor_belt(), None);
        assert_eq!(board.space(Coord::new(6, 7)).unwrap().checkpoint(), Some(1));
        assert_eq!(board.space(Coord::new(3, 6)).unwrap().conveyor_belt(), Some(Heading::South));
        assert!(board.space(Coord::new(3, 3)).unwrap().actions().is_empty());
        // The walled top row stops the wrap-around.
        assert_eq!(board.neighbour(Coord::new(3, 0), Heading::North), None);
    }

    #[test]
    fn test_advanced_board_layout() {
        let board = create_board(ADVANCED_BOARD).unwrap();
        assert_eq!(board.space(Coord::new(7, 5)).unwrap().checkpoint(), Some(1));
        assert_eq!(board.space(Coord::new(4, 4)).unwrap().checkpoint(), Some(2));
        assert!(board.space(Coord::new(1, 1)).unwrap().has_wall(Heading::West));
        assert_eq!(board.space(Coord::new(6, 5)).unwrap().conveyor_belt(), Some(Heading::West));
    }
}
