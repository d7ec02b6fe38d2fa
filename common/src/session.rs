use crate::agent::Agent;
use crate::board::Cell;
use crate::game::{Game, GameState};
use rand::Rng;

/// A move the agent chose, tagged with how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Proven safe by the knowledge base.
    Safe(Cell),
    /// Picked at random because nothing could be proven.
    Guess(Cell),
}

impl Move {
    pub fn cell(self) -> Cell {
        match self {
            Move::Safe(cell) | Move::Guess(cell) => cell,
        }
    }
}

/// The outcome of playing one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Revealed { played: Move, count: u8 },
    Exploded(Cell),
    /// Every cell is either played or a known mine.
    Exhausted,
}

/// One game played by one agent.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub game: Game,
    pub agent: Agent,
}

impl Session {
    pub fn new(game: Game) -> Self {
        let agent = Agent::new(game.board.height, game.board.width);
        Session { game, agent }
    }

    /// Deserializes a session from bytes.
    pub fn deserialize(bts: &[u8]) -> anyhow::Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    /// Serializes the session to bytes.
    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    /// Prefers a proven-safe cell and guesses only when none exists.
    pub fn next_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.agent
            .make_safe_move()
            .map(Move::Safe)
            .or_else(|| self.agent.make_random_move(rng).map(Move::Guess))
    }

    /// Lets the agent choose and play one move.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> anyhow::Result<Turn> {
        if self.game.game_state != GameState::Playing {
            anyhow::bail!("game_ended");
        }
        match self.next_move(rng) {
            Some(played) => self.play_move(played),
            None => {
                self.flag_known_mines()?;
                Ok(Turn::Exhausted)
            }
        }
    }

    /// Plays a specific move, feeding the revealed number to the agent.
    pub fn play_move(&mut self, played: Move) -> anyhow::Result<Turn> {
        let at = played.cell();
        let Some(count) = self.game.reveal(at)? else {
            return Ok(Turn::Exploded(at));
        };

        self.agent.add_knowledge(at, count as usize);
        self.flag_known_mines()?;
        Ok(Turn::Revealed { played, count })
    }

    /// Steps until the game ends or no move is left, returning the final state.
    pub fn play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> anyhow::Result<GameState> {
        while self.game.game_state == GameState::Playing {
            match self.step(rng)? {
                Turn::Revealed { .. } => {}
                Turn::Exploded(_) | Turn::Exhausted => break,
            }
        }
        Ok(self.game.game_state)
    }

    fn flag_known_mines(&mut self) -> anyhow::Result<()> {
        for &cell in self.agent.known_mines() {
            self.game.flag(cell)?;
        }
        Ok(())
    }
}
