use crate::board::{Board, Cell};
use crate::constraint::Constraint;
use itertools::Itertools;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;

/// A Minesweeper player that only acts on what it can prove.
///
/// The agent accumulates a knowledge base of [`Constraint`]s, one per revealed
/// cell plus whatever the subset rule derives from them, and keeps it closed
/// under inference: after every [`Agent::add_knowledge`] call, every cell that
/// the knowledge base determines is recorded in `known_mines` or `known_safes`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Agent {
    board: Board,
    /// Cells that have been revealed, whether chosen by the agent or not.
    moves_made: BTreeSet<Cell>,
    known_mines: BTreeSet<Cell>,
    known_safes: BTreeSet<Cell>,
    /// Live constraints. Never holds an empty constraint or a duplicate once
    /// `add_knowledge` returns.
    knowledge: Vec<Constraint>,
}

impl Agent {
    pub fn new(height: usize, width: usize) -> Self {
        Agent {
            board: Board::new(height, width),
            moves_made: BTreeSet::new(),
            known_mines: BTreeSet::new(),
            known_safes: BTreeSet::new(),
            knowledge: Vec::new(),
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn known_mines(&self) -> &BTreeSet<Cell> {
        &self.known_mines
    }

    pub fn known_safes(&self) -> &BTreeSet<Cell> {
        &self.known_safes
    }

    pub fn knowledge(&self) -> &[Constraint] {
        &self.knowledge
    }

    /// Records `cell` as a mine and removes it from every constraint.
    /// Returns whether the cell was newly learned.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        assert!(
            !self.known_safes.contains(&cell),
            "{cell} cannot be a mine, it is already known to be safe"
        );
        let learned = self.known_mines.insert(cell);
        for constraint in &mut self.knowledge {
            constraint.mark_mine(cell);
        }
        learned
    }

    /// Records `cell` as safe and removes it from every constraint.
    /// Returns whether the cell was newly learned.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        assert!(
            !self.known_mines.contains(&cell),
            "{cell} cannot be safe, it is already known to be a mine"
        );
        let learned = self.known_safes.insert(cell);
        for constraint in &mut self.knowledge {
            constraint.mark_safe(cell);
        }
        learned
    }

    /// Called when the game reveals `cell` and reports `count` mines among its neighbors.
    ///
    /// 1. Records the move and marks the cell safe.
    /// 2. Turns the report into a constraint over the still-undetermined neighbors.
    /// 3. Runs inference to a fixed point, so every consequence is known on return.
    ///
    /// Panics if the report is impossible for this board or contradicts what is
    /// already known. The game only reveals non-mine cells and reports truthful
    /// counts, so this indicates a bug in the caller.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) {
        assert!(
            self.board.contains(cell),
            "{cell} is outside the {}x{} board",
            self.board.height,
            self.board.width
        );
        let neighbors: Vec<Cell> = self.board.neighbors(cell).collect();
        assert!(
            count <= neighbors.len(),
            "{cell} reports {count} mines but has only {} neighbors",
            neighbors.len()
        );

        // --- 1. The revealed cell itself ---
        self.moves_made.insert(cell);
        self.mark_safe(cell);

        // --- 2. New constraint from the neighborhood ---
        // Known safes carry no information; known mines are already accounted for.
        let (mines, undetermined): (Vec<Cell>, Vec<Cell>) = neighbors
            .into_iter()
            .filter(|n| !self.known_safes.contains(n))
            .partition(|n| self.known_mines.contains(n));
        let remaining = count.checked_sub(mines.len()).unwrap_or_else(|| {
            panic!(
                "{cell} reports {count} mines but {} neighbors are known mines",
                mines.len()
            )
        });
        self.insert(Constraint::new(undetermined, remaining));

        // --- 3. Derive everything that follows ---
        self.infer();
    }

    /// A cell known to be safe that has not been played yet, if any.
    /// Picks the first such cell in `(row, col)` order. Does not modify the agent.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.known_safes.difference(&self.moves_made).next().copied()
    }

    /// A uniformly chosen cell that has not been played and is not a known mine.
    ///
    /// The move is not recorded; feed the game's answer back via `add_knowledge`.
    pub fn make_random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .board
            .cells()
            .filter(|c| !self.moves_made.contains(c) && !self.known_mines.contains(c))
            .collect();
        candidates.choose(rng).copied()
    }

    /// Multi-line dump of the knowledge base for debugging.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for constraint in &self.knowledge {
            out.push_str(&format!("{constraint}\n"));
        }
        out.push_str(&format!(
            "Safes: {{{}}}\n",
            self.known_safes.difference(&self.moves_made).join(", ")
        ));
        out.push_str(&format!("Mines: {{{}}}\n", self.known_mines.iter().join(", ")));
        out
    }

    /// Appends a constraint unless it is empty or already known.
    fn insert(&mut self, constraint: Constraint) -> bool {
        if constraint.is_empty() || self.knowledge.contains(&constraint) {
            return false;
        }
        self.knowledge.push(constraint);
        true
    }

    /// Closes the knowledge base under inference.
    ///
    /// Each pass marks every cell a constraint settles, drops empty and duplicate
    /// constraints, then applies the subset rule to every pair. Stops after a
    /// pass that learns no cell and adds or removes no constraint. Known cells
    /// only grow and derived constraints are strictly smaller than their
    /// parents, so this terminates.
    fn infer(&mut self) {
        loop {
            let mut changed = false;

            // Marking shrinks constraints in place but never removes one, so indices stay valid.
            for i in 0..self.knowledge.len() {
                let safes = self.knowledge[i].derived_safes();
                let mines = self.knowledge[i].derived_mines();
                for cell in safes {
                    changed |= self.mark_safe(cell);
                }
                for cell in mines {
                    changed |= self.mark_mine(cell);
                }
            }

            let before = self.knowledge.len();
            self.knowledge = std::mem::take(&mut self.knowledge)
                .into_iter()
                .filter(|c| !c.is_empty())
                .unique()
                .collect();
            changed |= self.knowledge.len() != before;

            let derived: Vec<Constraint> = self
                .knowledge
                .iter()
                .tuple_combinations()
                .flat_map(|(a, b)| [a.resolve_against(b), b.resolve_against(a)])
                .flatten()
                .collect();
            for constraint in derived {
                changed |= self.insert(constraint);
            }

            if !changed {
                break;
            }
        }
    }
}
