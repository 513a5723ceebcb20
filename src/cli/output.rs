//! Output formatting utilities for CLI.

use roborally::simulation::GameResult;
use roborally::{Board, Coord, Heading};
use serde::Serialize;
use std::fmt::Write;

/// Board markers for players in seating order.
const PLAYER_MARKS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    let _ = writeln!(output, "  Board: {}", result.board);
    match result.winner.and_then(|w| result.players.get(w)) {
        Some(winner) => {
            let _ = writeln!(output, "  Winner: {} ({})", winner.name, winner.color);
        }
        None => output.push_str("  Winner: none\n"),
    }
    let _ = writeln!(output, "  Rounds: {}", result.rounds_played);
    let _ = writeln!(
        output,
        "  Moves: {}  Choices: {}\n",
        result.moves, result.interactions
    );

    for player in &result.players {
        let mark = PLAYER_MARKS.get(player.id).copied().unwrap_or('?');
        let position = player
            .position
            .map_or_else(|| "off board".to_string(), |c| c.to_string());
        let _ = writeln!(
            output,
            "  [{mark}] {}: {} checkpoints, at {position} facing {}",
            player.name, player.checkpoints_reached, player.heading
        );
    }

    output
}

/// Draw the preset layout with the players' final positions.
///
/// Players are letters, checkpoints digits, belts arrows.
pub(super) fn render_board(board: &Board, result: &GameResult) -> String {
    let mut output = String::new();
    for y in 0..board.height() {
        for x in 0..board.width() {
            let coord = Coord::new(x, y);
            let player = result.players.iter().find(|p| p.position == Some(coord));
            let cell = match (player, board.space(coord)) {
                (Some(p), _) => PLAYER_MARKS.get(p.id).copied().unwrap_or('?'),
                (None, Some(space)) => match (space.checkpoint(), space.conveyor_belt()) {
                    (Some(n), _) => char::from_digit(n, 10).unwrap_or('*'),
                    (None, Some(heading)) => belt_arrow(heading),
                    (None, None) => '.',
                },
                (None, None) => ' ',
            };
            output.push(cell);
        }
        output.push('\n');
    }
    output
}

const fn belt_arrow(heading: Heading) -> char {
    match heading {
        Heading::South => 'v',
        Heading::West => '<',
        Heading::North => '^',
        Heading::East => '>',
    }
}

/// Aggregated statistics over many games.
#[derive(Debug, Default)]
pub(super) struct BatchStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per player.
    pub(super) wins: Vec<u64>,
    /// Games that hit the round limit without a winner.
    pub(super) unfinished: u64,
    /// Checkpoints reached per player, summed over games.
    checkpoints: Vec<u64>,
    /// Total rounds across all games.
    total_rounds: u64,
    /// Total moves across all games.
    total_moves: u64,
    /// Total interaction choices across all games.
    total_interactions: u64,
}

impl BatchStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; num_players],
            unfinished: 0,
            checkpoints: vec![0; num_players],
            total_rounds: 0,
            total_moves: 0,
            total_interactions: 0,
        }
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_rounds += u64::from(result.rounds_played);
        self.total_moves += result.moves;
        self.total_interactions += u64::from(result.interactions);

        match result.winner.and_then(|w| self.wins.get_mut(w)) {
            Some(wins) => *wins += 1,
            None => self.unfinished += 1,
        }

        for player in &result.players {
            if let Some(sum) = self.checkpoints.get_mut(player.id) {
                *sum += u64::from(player.checkpoints_reached);
            }
        }
    }

    /// Merge another thread's stats into this one.
    pub(super) fn merge(&mut self, other: &BatchStats) {
        self.games_played += other.games_played;
        self.unfinished += other.unfinished;
        self.total_rounds += other.total_rounds;
        self.total_moves += other.total_moves;
        self.total_interactions += other.total_interactions;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.checkpoints.iter_mut().zip(&other.checkpoints) {
            *a += b;
        }
    }

    /// Number of players tracked.
    pub(super) fn player_count(&self) -> usize {
        self.wins.len()
    }

    /// Get win rate for a player (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average checkpoints reached per game for a player.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_checkpoints(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.checkpoints.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average game length in rounds.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_rounds(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.games_played as f64
    }

    /// Average robot moves per game.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_moves(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games_played as f64
    }

    /// Average interaction choices per game.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_interactions(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_interactions as f64 / self.games_played as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Board preset name.
    board: String,
    /// First seed of the batch.
    base_seed: u64,
    /// Total games played.
    games_played: u64,
    /// Games without a winner.
    unfinished: u64,
    /// Average game length in rounds.
    avg_rounds: f64,
    /// Average robot moves per game.
    avg_moves: f64,
    /// Average interaction choices per game.
    avg_interactions: f64,
    /// Per-player statistics.
    players: Vec<JsonBatchPlayer>,
}

/// JSON-serializable per-player batch stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchPlayer {
    /// Player number (1-based).
    player: usize,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average checkpoints reached.
    avg_checkpoints: f64,
}

impl JsonBatchResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats, board: &str, base_seed: u64) -> Self {
        let players = (0..stats.player_count())
            .map(|i| JsonBatchPlayer {
                player: i + 1,
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_checkpoints: stats.avg_checkpoints(i),
            })
            .collect();

        Self {
            board: board.to_string(),
            base_seed,
            games_played: stats.games_played,
            unfinished: stats.unfinished,
            avg_rounds: stats.avg_rounds(),
            avg_moves: stats.avg_moves(),
            avg_interactions: stats.avg_interactions(),
            players,
        }
    }
}

/// Format batch stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_batch_text(stats: &BatchStats, board: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Batch Results ({} games on {board})", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for i in 0..stats.player_count() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let _ = writeln!(
            output,
            "  Player {}: {:.1}% ({wins} wins, {:.2} checkpoints/game)",
            i + 1,
            stats.win_rate(i) * 100.0,
            stats.avg_checkpoints(i)
        );
    }
    let unfinished_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.unfinished as f64 / stats.games_played as f64 * 100.0
    };
    let _ = writeln!(
        output,
        "  Unfinished: {} ({unfinished_rate:.1}%)\n",
        stats.unfinished
    );

    let _ = writeln!(output, "Average Game Length: {:.1} rounds", stats.avg_rounds());
    let _ = writeln!(output, "Average Moves: {:.1}", stats.avg_moves());
    let _ = writeln!(output, "Average Choices: {:.1}", stats.avg_interactions());

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str("player,wins,win_rate,avg_checkpoints\n");

    for i in 0..stats.player_count() {
        let _ = writeln!(
            output,
            "{},{},{:.4},{:.2}",
            i + 1,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_checkpoints(i)
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use roborally::simulation::PlayerSummary;

    fn result(winner: Option<usize>, rounds: u32) -> GameResult {
        GameResult {
            seed: 7,
            board: "Simple board".to_string(),
            winner,
            rounds_played: rounds,
            interactions: 1,
            moves: 10,
            players: (0..2)
                .map(|id| PlayerSummary {
                    id,
                    name: format!("Player {}", id + 1),
                    color: "red".to_string(),
                    position: Some(Coord::new(u16::try_from(id).unwrap_or(0), 0)),
                    heading: Heading::South,
                    checkpoints_reached: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_stats_merge() {
        let mut a = BatchStats::new(2);
        a.add_result(&result(Some(0), 4));
        let mut b = BatchStats::new(2);
        b.add_result(&result(None, 6));
        b.add_result(&result(Some(1), 2));
        a.merge(&b);

        assert_eq!(a.games_played, 3);
        assert_eq!(a.wins, vec![1, 1]);
        assert_eq!(a.unfinished, 1);
        assert!((a.avg_rounds() - 4.0).abs() < f64::EPSILON);
        assert!((a.avg_checkpoints(0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_csv_rows() {
        let mut stats = BatchStats::new(2);
        stats.add_result(&result(Some(0), 3));
        let csv = format_batch_csv(&stats);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,1,1.0000,1.00");
    }

    #[test]
    fn test_render_board_marks_players() {
        let board = Board::new(3, 2, "tiny").unwrap_or_else(|e| panic!("{e}"));
        let rendered = render_board(&board, &result(None, 1));
        assert_eq!(rendered, "AB.\n...\n");
    }
}
