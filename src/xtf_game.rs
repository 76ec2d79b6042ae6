// Core game logic for five-in-a-row
// Handles the grid, turn order, win-line generation and outcome detection

use std::rc::Rc;
use tracing::{debug, info};

pub const BOARD_SIZE: usize = 10; // Grid is BOARD_SIZE x BOARD_SIZE
pub const WIN_LENGTH: usize = 5; // Markers in a row needed to win

/// The two markers a player can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// The player who moves after this one
    pub fn other(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Label used in captions ("X" / "O")
    pub fn label(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Occupied(Player),
}

/// Grid coordinate in (row, col) order
pub type Coord = (usize, usize);

/// One candidate winning run of collinear cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinLine {
    cells: Vec<Coord>,
}

impl WinLine {
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// First and last coordinates of the run
    pub fn endpoints(&self) -> (Coord, Coord) {
        // lines are never empty: generate() skips k == 0
        (self.cells[0], self.cells[self.cells.len() - 1])
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }
}

/// Every winning run on an n x n grid, in scan order:
/// horizontal, vertical, down-right diagonal, down-left diagonal.
/// Depends only on (n, k) so one set is shared by all games.
#[derive(Debug, PartialEq, Eq)]
pub struct WinLines {
    size: usize,
    lines: Vec<WinLine>,
}

impl WinLines {
    /// Build all runs of `k` consecutive in-bounds cells.
    /// Each varying axis has exactly `n - k + 1` start positions.
    pub fn generate(n: usize, k: usize) -> Self {
        let mut lines = Vec::new();
        if k == 0 || k > n {
            return WinLines { size: n, lines };
        }
        let starts = n - k + 1;
        // horizontal
        for r in 0..n {
            for c in 0..starts {
                lines.push(WinLine { cells: (0..k).map(|i| (r, c + i)).collect() });
            }
        }
        // vertical
        for r in 0..starts {
            for c in 0..n {
                lines.push(WinLine { cells: (0..k).map(|i| (r + i, c)).collect() });
            }
        }
        // down-right
        for r in 0..starts {
            for c in 0..starts {
                lines.push(WinLine { cells: (0..k).map(|i| (r + i, c + i)).collect() });
            }
        }
        // down-left: start column runs from k-1 to n-1
        for r in 0..starts {
            for c in (k - 1)..n {
                lines.push(WinLine { cells: (0..k).map(|i| (r + i, c - i)).collect() });
            }
        }
        WinLines { size: n, lines }
    }

    /// Standard 10x10 board, five in a row
    pub fn standard() -> Self {
        WinLines::generate(BOARD_SIZE, WIN_LENGTH)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WinLine> {
        self.lines.iter()
    }
}

/// Game status; changes at most once away from InProgress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win { winner: Player, line: WinLine },
    Tie,
}

/// Main game state for one play-through
#[derive(Debug, Clone)]
pub struct Game {
    size: usize,           // Board width and height
    grid: Vec<Cell>,       // Row-major cells
    turn: Player,          // Player who places the next marker
    moves: usize,          // Accepted moves == occupied cells
    outcome: Outcome,      // Current status
    lines: Rc<WinLines>,   // Shared precomputed win lines
}

impl Game {
    /// Create an empty game on the grid described by `lines`
    pub fn new(lines: Rc<WinLines>, first: Player) -> Self {
        let size = lines.size();
        info!(first = first.label(), size, "new game");
        Game {
            size,
            grid: vec![Cell::Empty; size * size],
            turn: first,
            moves: 0,
            outcome: Outcome::InProgress,
            lines,
        }
    }

    /// Convert (row, col) coordinates to flat array index
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome != Outcome::InProgress
    }

    /// Cell at (row, col); out-of-bounds reads as Empty
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row >= self.size || col >= self.size {
            return Cell::Empty;
        }
        self.grid[self.index(row, col)]
    }

    /// True when (row, col) is part of the winning line
    pub fn winning_cell(&self, row: usize, col: usize) -> bool {
        match &self.outcome {
            Outcome::Win { line, .. } => line.contains(row, col),
            _ => false,
        }
    }

    /// Place the current player's marker at (row, col).
    /// Ignored (returns false) when out of bounds, when the game is over,
    /// or when the cell is taken. The turn does not pass after a winning move.
    pub fn attempt_move(&mut self, row: usize, col: usize) -> bool {
        if row >= self.size || col >= self.size || self.is_over() {
            return false;
        }
        let idx = self.index(row, col);
        if self.grid[idx] != Cell::Empty {
            return false;
        }
        self.grid[idx] = Cell::Occupied(self.turn);
        self.moves += 1;
        debug!(player = self.turn.label(), row, col, moves = self.moves, "move accepted");

        if let Some(line) = self.find_win() {
            let (first, last) = line.endpoints();
            info!(winner = self.turn.label(), ?first, ?last, moves = self.moves, "game won");
            self.outcome = Outcome::Win { winner: self.turn, line };
            return true;
        }
        if self.moves == self.size * self.size {
            info!(moves = self.moves, "game tied");
            self.outcome = Outcome::Tie;
        }
        self.turn = self.turn.other();
        true
    }

    /// First line (in scan order) whose cells all hold the same marker
    fn find_win(&self) -> Option<WinLine> {
        self.lines
            .iter()
            .find(|line| {
                let mut cells = line.cells().iter().map(|&(r, c)| self.grid[self.index(r, c)]);
                match cells.next() {
                    Some(Cell::Occupied(p)) => cells.all(|cell| cell == Cell::Occupied(p)),
                    _ => false,
                }
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_game(first: Player) -> Game {
        Game::new(Rc::new(WinLines::standard()), first)
    }

    fn occupied(g: &Game) -> usize {
        let mut n = 0;
        for r in 0..g.size() {
            for c in 0..g.size() {
                if g.cell(r, c) != Cell::Empty {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn standard_lines_count_and_bounds() {
        let lines = WinLines::standard();
        assert_eq!(lines.len(), 60 + 60 + 36 + 36);
        for line in lines.iter() {
            assert_eq!(line.cells().len(), WIN_LENGTH);
            assert!(line.cells().iter().all(|&(r, c)| r < BOARD_SIZE && c < BOARD_SIZE));
        }
    }

    #[test]
    fn lines_scan_order() {
        let lines: Vec<_> = WinLines::standard().iter().cloned().collect();
        assert_eq!(lines[0].endpoints(), ((0, 0), (0, 4)));
        assert_eq!(lines[60].endpoints(), ((0, 0), (4, 0)));
        assert_eq!(lines[120].endpoints(), ((0, 0), (4, 4)));
        assert_eq!(lines[156].endpoints(), ((0, 4), (4, 0)));
        assert_eq!(lines[191].endpoints(), ((5, 9), (9, 5)));
    }

    #[test]
    fn degenerate_line_lengths() {
        assert_eq!(WinLines::generate(3, 0).len(), 0);
        assert_eq!(WinLines::generate(3, 4).len(), 0);
        // 3x3 tic-tac-toe: 3 rows, 3 cols, 2 diagonals
        assert_eq!(WinLines::generate(3, 3).len(), 8);
    }

    #[test]
    fn horizontal_win_reports_endpoints() {
        let mut g = new_game(Player::X);
        // X on row 0, O on row 9
        for c in 0..4 {
            assert!(g.attempt_move(0, c));
            assert!(g.attempt_move(9, c));
        }
        assert!(g.attempt_move(0, 4));
        match g.outcome() {
            Outcome::Win { winner, line } => {
                assert_eq!(*winner, Player::X);
                assert_eq!(line.endpoints(), ((0, 0), (0, 4)));
            }
            other => panic!("expected win, got {:?}", other),
        }
        // no flip after the winning move
        assert_eq!(g.turn(), Player::X);
        assert!(g.winning_cell(0, 2));
        assert!(!g.winning_cell(9, 2));
    }

    #[test]
    fn diagonal_win_for_o() {
        let mut g = new_game(Player::O);
        for i in 0..4 {
            assert!(g.attempt_move(i, i));
            assert!(g.attempt_move(i, 9));
        }
        assert!(g.attempt_move(4, 4));
        match g.outcome() {
            Outcome::Win { winner, line } => {
                assert_eq!(*winner, Player::O);
                assert_eq!(line.endpoints(), ((0, 0), (4, 4)));
            }
            other => panic!("expected win, got {:?}", other),
        }
    }

    #[test]
    fn anti_diagonal_win() {
        let mut g = new_game(Player::X);
        for i in 0..4 {
            assert!(g.attempt_move(2 + i, 8 - i));
            assert!(g.attempt_move(0, i));
        }
        assert!(g.attempt_move(6, 4));
        match g.outcome() {
            Outcome::Win { winner, line } => {
                assert_eq!(*winner, Player::X);
                assert_eq!(line.endpoints(), ((2, 8), (6, 4)));
            }
            other => panic!("expected win, got {:?}", other),
        }
    }

    #[test]
    fn occupied_cell_is_noop() {
        let mut g = new_game(Player::X);
        assert!(g.attempt_move(3, 3));
        let before = (g.turn(), g.moves(), g.cell(3, 3));
        assert!(!g.attempt_move(3, 3));
        assert_eq!((g.turn(), g.moves(), g.cell(3, 3)), before);
        assert_eq!(g.cell(3, 3), Cell::Occupied(Player::X));
    }

    #[test]
    fn out_of_bounds_is_noop() {
        let mut g = new_game(Player::X);
        assert!(!g.attempt_move(BOARD_SIZE, 0));
        assert!(!g.attempt_move(0, BOARD_SIZE));
        assert_eq!(g.moves(), 0);
        assert_eq!(g.turn(), Player::X);
    }

    #[test]
    fn no_moves_after_win() {
        let mut g = new_game(Player::X);
        for r in 0..4 {
            g.attempt_move(r, 0);
            g.attempt_move(r, 1);
        }
        g.attempt_move(4, 0);
        assert!(g.is_over());
        assert!(!g.attempt_move(7, 7));
        assert_eq!(g.cell(7, 7), Cell::Empty);
        assert_eq!(g.moves(), 9);
    }

    /// Pairs of columns alternate, shifted by one every row:
    /// no run of five equal markers in any direction, 50 of each.
    fn tie_marker(r: usize, c: usize) -> Player {
        if (c / 2 + r) % 2 == 0 { Player::X } else { Player::O }
    }

    #[test]
    fn tie_pattern_has_no_five() {
        let lines = WinLines::standard();
        for line in lines.iter() {
            let first = tie_marker(line.cells()[0].0, line.cells()[0].1);
            assert!(line.cells().iter().any(|&(r, c)| tie_marker(r, c) != first));
        }
    }

    #[test]
    fn full_board_without_five_is_tie() {
        let mut g = new_game(Player::X);
        let mut xs: Vec<Coord> = Vec::new();
        let mut os: Vec<Coord> = Vec::new();
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                match tie_marker(r, c) {
                    Player::X => xs.push((r, c)),
                    Player::O => os.push((r, c)),
                }
            }
        }
        assert_eq!(xs.len(), os.len());
        for (x, o) in xs.iter().zip(os.iter()) {
            assert!(g.attempt_move(x.0, x.1));
            assert_eq!(*g.outcome(), Outcome::InProgress);
            assert!(g.attempt_move(o.0, o.1));
        }
        assert_eq!(g.moves(), BOARD_SIZE * BOARD_SIZE);
        assert_eq!(*g.outcome(), Outcome::Tie);
        assert!(!g.attempt_move(0, 0));
    }

    proptest! {
        #[test]
        fn random_play_keeps_invariants(
            first in prop_oneof![Just(Player::X), Just(Player::O)],
            clicks in prop::collection::vec((0usize..12, 0usize..12), 0..300),
        ) {
            let mut g = new_game(first);
            let mut was_over = false;
            for (r, c) in clicks {
                let before_turn = g.turn();
                let before_moves = g.moves();
                let before_cell = g.cell(r, c);
                let accepted = g.attempt_move(r, c);

                if accepted {
                    prop_assert_eq!(before_cell, Cell::Empty);
                    prop_assert_eq!(g.moves(), before_moves + 1);
                    prop_assert_eq!(g.cell(r, c), Cell::Occupied(before_turn));
                    match g.outcome() {
                        Outcome::Win { winner, .. } => {
                            prop_assert_eq!(*winner, before_turn);
                            prop_assert_eq!(g.turn(), before_turn);
                        }
                        _ => prop_assert_eq!(g.turn(), before_turn.other()),
                    }
                } else {
                    prop_assert_eq!(g.moves(), before_moves);
                    prop_assert_eq!(g.turn(), before_turn);
                    prop_assert_eq!(g.cell(r, c), before_cell);
                }

                prop_assert_eq!(g.moves(), occupied(&g));
                if was_over {
                    prop_assert!(!accepted);
                }
                was_over = g.is_over();
            }
        }
    }
}
