//! A Minesweeper player that reasons over "exactly N of these cells are mines"
//! constraints and only guesses when nothing can be proven.

pub mod agent;
pub mod board;
pub mod constraint;
pub mod game;
pub mod session;

pub use agent::Agent;
pub use board::{Board, Cell};
pub use constraint::Constraint;
pub use game::{Game, GameState, Tile};
pub use session::{Move, Session, Turn};
