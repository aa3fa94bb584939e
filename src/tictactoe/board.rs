//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::game::GameOutcome;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// Complete board state including cells and whose turn it is
///
/// Cells are indexed row-major: `index = row * 3 + col`. The type implements
/// `Copy` since it's only 10 bytes, and every operation that changes the board
/// returns a fresh value; a cell, once occupied, never changes for the
/// lifetime of a given state. The search relies on this value-copy isolation
/// when it explores many alternative futures from the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

/// Count of each piece type on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PieceCount {
    x: usize,
    o: usize,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        Self::new_with_player(Player::X)
    }

    /// Create a new empty board with a specified player to move first.
    pub fn new_with_player(first_player: Player) -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
            to_move: first_player,
        }
    }

    /// Helper: Parse 9 cells from a slice of characters.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 characters or any character is invalid.
    fn parse_cells(chars: &[char], context: &str) -> Result<[Cell; 9], crate::Error> {
        if chars.len() < 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: context.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: context.to_string(),
            })?;
        }

        Ok(cells)
    }

    /// Helper: Count pieces on the board.
    fn count_pieces(cells: &[Cell; 9]) -> PieceCount {
        let mut count = PieceCount { x: 0, o: 0 };
        for cell in cells {
            match cell {
                Cell::X => count.x += 1,
                Cell::O => count.o += 1,
                Cell::Empty => {}
            }
        }
        count
    }

    /// Helper: Parse a player string ("X" or "O").
    fn parse_player(player_str: &str, context: &str) -> Result<Player, crate::Error> {
        match player_str {
            "X" => Ok(Player::X),
            "O" => Ok(Player::O),
            _ => Err(crate::Error::InvalidPlayerString {
                player: player_str.to_string(),
                label: context.to_string(),
            }),
        }
    }

    fn determine_turn_from_counts(count: &PieceCount) -> Result<Player, crate::Error> {
        if count.x == count.o {
            Ok(Player::X)
        } else if count.x == count.o + 1 {
            Ok(Player::O)
        } else {
            Err(crate::Error::InvalidPieceCounts {
                x_count: count.x,
                o_count: count.o,
            })
        }
    }

    fn ensure_turn_consistent_with_counts(
        count: &PieceCount,
        player: Player,
        context: &str,
    ) -> Result<(), crate::Error> {
        let valid = match player {
            Player::X => count.x == count.o || count.o == count.x + 1,
            Player::O => count.x == count.o || count.x == count.o + 1,
        };

        if valid {
            Ok(())
        } else {
            Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "piece counts (X={}, O={}) are inconsistent with {} to move in '{}'",
                    count.x,
                    count.o,
                    match player {
                        Player::X => "X",
                        Player::O => "O",
                    },
                    context
                ),
            })
        }
    }

    /// Create a board from a string representation.
    ///
    /// The string should contain 9 characters (whitespace is filtered out) and
    /// may optionally include a suffix `_X` or `_O` to explicitly set the player
    /// to move. When the suffix is omitted, the player is inferred from the piece
    /// counts, defaulting to X-first semantics for ambiguous cases.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The board part has fewer than 9 non-whitespace characters
    /// - Any character is not a valid cell representation
    /// - The piece counts are invalid (difference greater than 1)
    /// - A provided `_X`/`_O` suffix conflicts with the piece counts
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (board_part, specified_turn) = Self::split_board_and_turn(&cleaned)?;
        let chars: Vec<char> = board_part.chars().collect();
        let cells = Self::parse_cells(&chars, s)?;
        let count = Self::count_pieces(&cells);

        let to_move = if let Some(turn) = specified_turn {
            Self::ensure_turn_consistent_with_counts(&count, turn, s).map(|_| turn)?
        } else {
            Self::determine_turn_from_counts(&count)?
        };

        Ok(BoardState { cells, to_move })
    }

    fn split_board_and_turn(cleaned: &str) -> Result<(&str, Option<Player>), crate::Error> {
        // A '_' in the first 9 characters is an empty-cell glyph, not a turn
        // separator; only a suffix after a full board is treated as a turn.
        if let Some(idx) = cleaned.rfind('_')
            && idx >= 9
        {
            let board = &cleaned[..idx];
            let suffix = &cleaned[idx + 1..];
            if suffix.is_empty() {
                return Err(crate::Error::InvalidPlayerString {
                    player: String::new(),
                    label: cleaned.to_string(),
                });
            }
            let player = Self::parse_player(suffix, cleaned)?;
            Ok((board, Some(player)))
        } else {
            Ok((cleaned, None))
        }
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions, in ascending index order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Make a move and return a new board state
    ///
    /// # Errors
    ///
    /// Returns `InvalidPosition` for an index outside 0-8 and `InvalidMove`
    /// for an occupied cell.
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<BoardState, crate::Error> {
        if pos >= 9 {
            return Err(crate::Error::InvalidPosition { position: pos });
        }

        if !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        let mut new_state = *self;
        new_state.cells[pos] = self.to_move.to_cell();
        new_state.to_move = self.to_move.opponent();
        Ok(new_state)
    }

    /// Apply a machine-generated move, wrapping failures as invariant violations
    ///
    /// Move generation always draws from `legal_moves`, so a failure here is a
    /// programming-error-class fault rather than a recoverable condition.
    #[must_use = "make_move_with_context returns a new board state; the original is unchanged"]
    pub fn make_move_with_context(
        &self,
        pos: usize,
        context: &str,
    ) -> Result<BoardState, crate::Error> {
        self.make_move(pos)
            .map_err(|e| crate::Error::IllegalGeneratedMove {
                position: pos,
                context: format!("{context}: {e}"),
            })
    }

    /// Get legal moves in this position (empty cells when game not terminal),
    /// in ascending index order
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        super::lines::LineAnalyzer::has_won(&self.cells, player)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.has_won(Player::X) || self.has_won(Player::O) || self.empty_positions().is_empty()
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty) && self.winner().is_none()
    }

    /// Get the winner if there is one
    ///
    /// A win is detected from the line table alone, independent of how many
    /// empty cells remain.
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Get the terminal outcome, or `None` while the game is ongoing
    pub fn outcome(&self) -> Option<GameOutcome> {
        if let Some(winner) = self.winner() {
            Some(GameOutcome::Win(winner))
        } else if self.cells.contains(&Cell::Empty) {
            None
        } else {
            Some(GameOutcome::Draw)
        }
    }

    /// Get a canonical string representation for use as a key
    pub fn encode(&self) -> String {
        format!(
            "{}_{}",
            self.cells.iter().map(|&c| c.to_char()).collect::<String>(),
            match self.to_move {
                Player::X => 'X',
                Player::O => 'O',
            }
        )
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = BoardState::new();
        assert_eq!(board.to_move, Player::X);
        for i in 0..9 {
            assert_eq!(board.cells[i], Cell::Empty);
        }
    }

    #[test]
    fn test_make_move() {
        let board = BoardState::new();

        // Valid move
        let result = board.make_move(4);
        assert!(result.is_ok());
        let new_board = result.unwrap();
        assert_eq!(new_board.cells[4], Cell::X);
        assert_eq!(new_board.to_move, Player::O);

        // Move on occupied cell
        let result2 = new_board.make_move(4);
        assert!(result2.is_err());
        assert!(result2.unwrap_err().to_string().contains("occupied"));
    }

    #[test]
    fn test_make_move_out_of_range() {
        let board = BoardState::new();
        let result = board.make_move(9);
        assert!(matches!(
            result,
            Err(crate::Error::InvalidPosition { position: 9 })
        ));
    }

    #[test]
    fn test_make_move_with_context_wraps_failure() {
        let board = BoardState::new().make_move(0).unwrap();
        let err = board
            .make_move_with_context(0, "replaying a generated line")
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::IllegalGeneratedMove { position: 0, .. }
        ));
    }

    #[test]
    fn test_legal_moves() {
        let mut board = BoardState::new();
        assert_eq!(board.legal_moves().len(), 9);

        board = board.make_move(0).unwrap();
        assert_eq!(board.legal_moves().len(), 8);
        assert!(!board.legal_moves().contains(&0));

        board = board.make_move(4).unwrap();
        assert_eq!(board.legal_moves().len(), 7);
        assert!(!board.legal_moves().contains(&4));
    }

    #[test]
    fn test_legal_moves_ascending_order() {
        let board = BoardState::from_string("X.O.X....").unwrap();
        let moves = board.legal_moves();
        let mut sorted = moves.clone();
        sorted.sort_unstable();
        assert_eq!(moves, sorted);
    }

    #[test]
    fn test_win_detection_horizontal() {
        let mut board = BoardState::new();
        // X wins on top row
        board = board.make_move(0).unwrap(); // X
        board = board.make_move(3).unwrap(); // O
        board = board.make_move(1).unwrap(); // X
        board = board.make_move(4).unwrap(); // O
        board = board.make_move(2).unwrap(); // X

        assert!(board.is_terminal());
        assert_eq!(board.winner(), Some(Player::X));
        assert_eq!(board.outcome(), Some(GameOutcome::Win(Player::X)));
    }

    #[test]
    fn test_win_detection_vertical() {
        let mut board = BoardState::new();
        // O wins on middle column (1, 4, 7)
        board = board.make_move(0).unwrap(); // X
        board = board.make_move(1).unwrap(); // O
        board = board.make_move(2).unwrap(); // X
        board = board.make_move(4).unwrap(); // O
        board = board.make_move(5).unwrap(); // X
        board = board.make_move(7).unwrap(); // O

        assert!(board.is_terminal());
        assert_eq!(board.winner(), Some(Player::O));
    }

    #[test]
    fn test_win_detection_diagonal() {
        let mut board = BoardState::new();
        // X wins on main diagonal
        board = board.make_move(0).unwrap(); // X
        board = board.make_move(1).unwrap(); // O
        board = board.make_move(4).unwrap(); // X
        board = board.make_move(2).unwrap(); // O
        board = board.make_move(8).unwrap(); // X

        assert!(board.is_terminal());
        assert_eq!(board.winner(), Some(Player::X));
    }

    #[test]
    fn test_win_with_empty_cells_remaining() {
        let board = BoardState::from_string("X.O.XO..X").unwrap();
        assert!(!board.empty_positions().is_empty());
        assert!(board.is_terminal());
        assert_eq!(board.winner(), Some(Player::X));
        assert!(board.legal_moves().is_empty());
    }

    #[test]
    fn test_draw_detection() {
        let mut board = BoardState::new();
        // Classic draw game
        board = board.make_move(0).unwrap(); // X
        board = board.make_move(1).unwrap(); // O
        board = board.make_move(2).unwrap(); // X
        board = board.make_move(4).unwrap(); // O
        board = board.make_move(3).unwrap(); // X
        board = board.make_move(6).unwrap(); // O
        board = board.make_move(5).unwrap(); // X
        board = board.make_move(8).unwrap(); // O
        board = board.make_move(7).unwrap(); // X

        assert!(board.is_terminal());
        assert!(board.is_draw());
        assert_eq!(board.winner(), None);
        assert_eq!(board.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_outcome_none_while_ongoing() {
        let board = BoardState::new().make_move(4).unwrap();
        assert_eq!(board.outcome(), None);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_player_alternation() {
        let mut board = BoardState::new();
        assert_eq!(board.to_move, Player::X);

        board = board.make_move(0).unwrap();
        assert_eq!(board.to_move, Player::O);

        board = board.make_move(1).unwrap();
        assert_eq!(board.to_move, Player::X);

        board = board.make_move(2).unwrap();
        assert_eq!(board.to_move, Player::O);
    }

    #[test]
    fn test_from_string() {
        let board = BoardState::from_string("XOX......").unwrap();
        assert_eq!(board.cells[0], Cell::X);
        assert_eq!(board.cells[1], Cell::O);
        assert_eq!(board.cells[2], Cell::X);
        // to_move is calculated based on piece count
        assert_eq!(board.to_move, Player::O);

        // Invalid string length
        let result = BoardState::from_string("XO");
        assert!(result.is_err());

        // Invalid character
        let result = BoardState::from_string("XOZ......");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_string_underscore_cells() {
        let board = BoardState::from_string("XX_______").unwrap();
        assert_eq!(board.cells[0], Cell::X);
        assert_eq!(board.cells[1], Cell::X);
        assert_eq!(board.cells[2], Cell::Empty);
    }

    #[test]
    fn test_from_string_with_turn_suffix() {
        let board = BoardState::from_string("........._O").unwrap();
        assert_eq!(board.to_move, Player::O);

        let board_with_o_first_move = BoardState::from_string("O........_X").unwrap();
        assert_eq!(board_with_o_first_move.to_move, Player::X);
    }

    #[test]
    fn test_from_string_rejects_inconsistent_suffix() {
        let err = BoardState::from_string("O........_O").unwrap_err();
        assert!(
            err.to_string().contains("inconsistent with O to move"),
            "expected inconsistency error, got {err}"
        );
    }

    #[test]
    fn test_from_string_rejects_bad_counts() {
        let result = BoardState::from_string("XXX......");
        assert!(matches!(
            result,
            Err(crate::Error::InvalidPieceCounts {
                x_count: 3,
                o_count: 0
            })
        ));
    }

    #[test]
    fn test_encode() {
        let board = BoardState::from_string("XO.......").unwrap();
        // encode appends the player to move
        // With 1 X and 1 O, it's X's turn (equal counts means X goes)
        assert_eq!(board.encode(), "XO......._X");

        let empty = BoardState::new();
        assert_eq!(empty.encode(), "........._X");
    }

    #[test]
    fn test_display() {
        let board = BoardState::from_string("XOX.O.X..").unwrap();
        let display = format!("{board}");
        // The Display implementation outputs the board with '.' for empty cells
        assert!(display.contains("XOX"));
        assert!(display.contains(".O."));
        assert!(display.contains("X.."));
    }

    #[test]
    fn test_empty_positions() {
        let board = BoardState::new();
        assert_eq!(board.empty_positions().len(), 9);

        let board = board.make_move(4).unwrap();
        let empty = board.empty_positions();
        assert_eq!(empty.len(), 8);
        assert!(!empty.contains(&4));
        assert!(empty.contains(&0));
    }
}
