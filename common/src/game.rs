use crate::board::{Board, Cell};
use rand::Rng;
use std::collections::BTreeSet;

/// The visible state of a single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Tile {
    Hidden,
    Flagged,
    Revealed(u8), // The u8 is the number of adjacent mines.
}

/// Represents the current state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// The game simulation: true mine placement plus what the player has uncovered.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Game {
    pub board: Board,
    /// The visible state of the board, indexed `tiles[row][col]`.
    pub tiles: Vec<Vec<Tile>>,
    /// Tracks the current status of the game (playing, won, lost).
    pub game_state: GameState,
    mines: BTreeSet<Cell>,
}

impl Game {
    /// Creates a board with `mines` mines placed uniformly at random.
    pub fn new<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        let board = Board::new(height, width);
        anyhow::ensure!(mines < board.len(), "too_many_mines");

        let placed = rand::seq::index::sample(rng, board.len(), mines)
            .into_iter()
            .map(|idx| Cell::new(idx / width, idx % width));
        Self::with_mines(height, width, placed)
    }

    /// Creates a board with a fixed mine layout.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> anyhow::Result<Self> {
        let board = Board::new(height, width);
        let mines: BTreeSet<Cell> = mines.into_iter().collect();
        anyhow::ensure!(mines.iter().all(|&m| board.contains(m)), "out_of_bounds");
        anyhow::ensure!(mines.len() < board.len(), "too_many_mines");

        Ok(Game {
            board,
            tiles: vec![vec![Tile::Hidden; width]; height],
            game_state: GameState::Playing,
            mines,
        })
    }

    /// Deserializes a game state from bytes.
    pub fn deserialize(bts: &[u8]) -> anyhow::Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    /// Serializes the game state to bytes.
    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    pub fn tile(&self, cell: Cell) -> Tile {
        self.tiles[cell.row][cell.col]
    }

    /// The number of mines among the neighbors of `cell`, not counting the cell itself.
    pub fn nearby_mines(&self, cell: Cell) -> u8 {
        self.board
            .neighbors(cell)
            .filter(|n| self.mines.contains(n))
            .count() as u8
    }

    /// Reveals a cell for the player.
    ///
    /// Returns `None` when the cell is a mine (the game is lost), otherwise the
    /// number of adjacent mines. Revealing an already revealed cell reports its
    /// number again without changing anything.
    pub fn reveal(&mut self, at: Cell) -> anyhow::Result<Option<u8>> {
        anyhow::ensure!(self.board.contains(at), "out_of_bounds");
        if let Tile::Revealed(count) = self.tile(at) {
            return Ok(Some(count));
        }
        if self.game_state != GameState::Playing {
            anyhow::bail!("game_ended");
        }

        if self.is_mine(at) {
            self.game_state = GameState::Lost;
            return Ok(None);
        }

        let count = self.nearby_mines(at);
        self.tiles[at.row][at.col] = Tile::Revealed(count);

        if self.won() {
            self.game_state = GameState::Won;
        }
        Ok(Some(count))
    }

    /// Marks a hidden cell as a mine found by the player.
    pub fn flag(&mut self, at: Cell) -> anyhow::Result<()> {
        anyhow::ensure!(self.board.contains(at), "out_of_bounds");
        match self.tile(at) {
            Tile::Revealed(_) => anyhow::bail!("already_revealed"),
            Tile::Flagged => return Ok(()),
            Tile::Hidden => self.tiles[at.row][at.col] = Tile::Flagged,
        }

        if self.game_state == GameState::Playing && self.won() {
            self.game_state = GameState::Won;
        }
        Ok(())
    }

    /// The game is won once the flags match the mines exactly, or once every
    /// non-mine cell has been revealed.
    pub fn won(&self) -> bool {
        let flagged: BTreeSet<Cell> = self
            .board
            .cells()
            .filter(|&c| self.tile(c) == Tile::Flagged)
            .collect();
        if !flagged.is_empty() && flagged == self.mines {
            return true;
        }

        let revealed = self
            .tiles
            .iter()
            .flatten()
            .filter(|t| matches!(t, Tile::Revealed(_)))
            .count();
        revealed == self.board.len() - self.mines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn test_game_initialization() {
        // Test that a new game is properly initialized with correct dimensions and state
        let mut rng = StdRng::seed_from_u64(3);
        let game = Game::new(5, 6, 7, &mut rng).unwrap();
        assert_eq!(game.board, Board::new(5, 6));
        assert_eq!(game.mines().len(), 7);
        assert_eq!(game.game_state, GameState::Playing);
        assert!(game.mines().iter().all(|&m| game.board.contains(m)));

        // Verify all cells start as hidden
        for row in &game.tiles {
            assert_eq!(row.len(), 6);
            for tile in row {
                assert_eq!(*tile, Tile::Hidden);
            }
        }
    }

    #[test]
    fn test_game_initialization_too_many_mines() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = Game::new(3, 3, 9, &mut rng).unwrap_err();
        assert_eq!(err.to_string(), "too_many_mines");
    }

    #[test]
    fn test_nearby_mines() {
        let game = Game::with_mines(3, 3, [c(0, 0), c(2, 2)]).unwrap();
        assert_eq!(game.nearby_mines(c(1, 1)), 2);
        assert_eq!(game.nearby_mines(c(0, 1)), 1);
        assert_eq!(game.nearby_mines(c(2, 0)), 0);
        // A mine does not count itself
        assert_eq!(game.nearby_mines(c(0, 0)), 0);
    }

    #[test]
    fn test_hitting_mine() {
        let mut game = Game::with_mines(2, 2, [c(1, 1)]).unwrap();
        assert_eq!(game.reveal(c(1, 1)).unwrap(), None);
        assert_eq!(game.game_state, GameState::Lost);

        // No further hidden cells can be revealed once the game has ended
        let err = game.reveal(c(0, 0)).unwrap_err();
        assert_eq!(err.to_string(), "game_ended");
    }

    #[test]
    fn test_revealing_every_safe_cell_wins() {
        let mut game = Game::with_mines(1, 3, [c(0, 2)]).unwrap();
        assert_eq!(game.reveal(c(0, 0)).unwrap(), Some(0));
        assert_eq!(game.game_state, GameState::Playing);

        // Revealing the same cell again is harmless
        assert_eq!(game.reveal(c(0, 0)).unwrap(), Some(0));

        assert_eq!(game.reveal(c(0, 1)).unwrap(), Some(1));
        assert_eq!(game.game_state, GameState::Won);
    }

    #[test]
    fn test_flagging_every_mine_wins() {
        let mut game = Game::with_mines(3, 3, [c(0, 0), c(2, 2)]).unwrap();
        game.flag(c(0, 0)).unwrap();
        assert!(!game.won());
        game.flag(c(2, 2)).unwrap();
        assert_eq!(game.game_state, GameState::Won);
    }

    #[test]
    fn test_flag_errors() {
        let mut game = Game::with_mines(2, 2, [c(0, 0)]).unwrap();
        game.reveal(c(1, 1)).unwrap();
        assert_eq!(game.flag(c(1, 1)).unwrap_err().to_string(), "already_revealed");
        assert_eq!(game.flag(c(2, 0)).unwrap_err().to_string(), "out_of_bounds");
        assert_eq!(game.reveal(c(0, 5)).unwrap_err().to_string(), "out_of_bounds");
    }

    #[test]
    fn test_serialization_preserves_progress() {
        let mut game = Game::with_mines(3, 4, [c(0, 3), c(2, 0)]).unwrap();
        game.reveal(c(1, 1)).unwrap();
        game.flag(c(0, 3)).unwrap();

        let restored = Game::deserialize(&game.serialize().unwrap()).unwrap();
        assert_eq!(restored.tiles, game.tiles);
        assert_eq!(restored.mines(), game.mines());
        assert_eq!(restored.game_state, GameState::Playing);
    }
}
