#![no_main]

//! Full round fuzzer.
//!
//! Builds an arbitrary board (walls, belts, checkpoints, robots), deals
//! arbitrary programs and drives complete rounds through the activation loop,
//! answering every interaction. The board must stay consistent after every
//! register step and every sweep.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roborally::game::{check_invariants, REGISTER_COUNT};
use roborally::{
    Board, CardSlot, Command, CommandCard, Coord, FieldAction, GameController, Heading, Phase,
    Player, TurnChoice,
};

/// A fuzzer-generated cell feature.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzFeature {
    Wall { x: u8, y: u8, side: u8 },
    Belt { x: u8, y: u8, heading: u8 },
    Checkpoint { x: u8, y: u8, sequence: u8 },
}

/// Structured input for round fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundInput {
    width: u8,
    height: u8,
    features: Vec<FuzzFeature>,
    /// Start cells, one robot each.
    robots: Vec<(u8, u8)>,
    /// Command indices per robot and register.
    programs: Vec<[u8; REGISTER_COUNT]>,
    choices: Vec<bool>,
    step_mode: bool,
    num_rounds: u8,
    seed: u64,
}

fn heading(raw: u8) -> Heading {
    Heading::ALL[usize::from(raw) % Heading::ALL.len()]
}

fn check(board: &Board) {
    let violations = check_invariants(board);
    assert!(violations.is_empty(), "{violations:?}");
}

fuzz_target!(|input: RoundInput| {
    // Cap values to avoid excessive runtime
    let width = u16::from(input.width % 16) + 1;
    let height = u16::from(input.height % 16) + 1;
    let num_rounds = (input.num_rounds % 5).max(1);
    let at = |x: u8, y: u8| Coord::new(u16::from(x) % width, u16::from(y) % height);

    let Ok(mut board) = Board::new(width, height, "fuzz") else {
        return;
    };
    let mut checkpoints = 0;
    for feature in input.features.iter().take(64) {
        match *feature {
            FuzzFeature::Wall { x, y, side } => {
                board.add_wall(at(x, y), heading(side));
            }
            FuzzFeature::Belt { x, y, heading: raw } => {
                board.add_action(at(x, y), FieldAction::conveyor_belt(heading(raw)));
            }
            FuzzFeature::Checkpoint { x, y, sequence } => {
                let sequence = u32::from(sequence % 6) + 1;
                checkpoints = checkpoints.max(sequence);
                board.add_action(at(x, y), FieldAction::checkpoint(sequence));
            }
        }
    }
    board.set_checkpoint_count(checkpoints);

    for (i, &(x, y)) in input.robots.iter().take(6).enumerate() {
        let id = board.add_player(Player::new(format!("P{i}"), "red"));
        // Occupied start cells leave the robot off the board.
        board.place_player(id, Some(at(x, y)));
    }
    if board.player_count() == 0 {
        return;
    }
    check(&board);

    let mut controller = GameController::with_seed(board, input.seed);
    let mut choices = input.choices.iter().copied().chain(std::iter::repeat(true));

    for _ in 0..num_rounds {
        controller.start_programming_phase();
        for (player, program) in input.programs.iter().enumerate() {
            for (register, &raw) in program.iter().enumerate() {
                let command = Command::ALL[usize::from(raw) % Command::ALL.len()];
                controller.board_mut().set_card(
                    player,
                    CardSlot::Program(register),
                    Some(CommandCard::new(command)),
                );
            }
        }
        controller.finish_programming_phase();

        loop {
            match controller.board().phase() {
                Phase::Activation if input.step_mode => controller.execute_step(),
                Phase::Activation => controller.execute_programs(),
                Phase::PlayerInteraction => {
                    let Some(player) = controller.board().current_player() else {
                        panic!("interaction without a current player");
                    };
                    let choice = if choices.next().unwrap_or(true) {
                        TurnChoice::Right
                    } else {
                        TurnChoice::Left
                    };
                    assert!(controller.turn_right_or_left(player, choice));
                }
                _ => break,
            }
            check(controller.board());
        }

        if controller.board().phase() == Phase::Finished {
            assert!(controller.winner().is_some());
            break;
        }
        controller.board_mut().take_events();
    }
});
