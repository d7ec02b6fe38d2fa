use crate::board::Cell;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// For example, a revealed '1' whose hidden neighbors are `{A, B, C}` yields
/// `{A, B, C} = 1`. Equality is structural, so two constraints over the same
/// cells with the same count are duplicates.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Constraint {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Constraint {
    /// Panics if `count` exceeds the number of cells, since no assignment
    /// could ever satisfy such a statement.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        assert!(
            count <= cells.len(),
            "constraint claims {count} mines among {} cells",
            cells.len()
        );
        Constraint { cells, count }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// All remaining cells when every one of them must be a mine.
    pub fn derived_mines(&self) -> BTreeSet<Cell> {
        if self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// All remaining cells when none of them can be a mine.
    pub fn derived_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Removes a cell now known to be a mine, crediting it against `count`.
    /// Returns whether the constraint changed.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if !self.cells.remove(&cell) {
            return false;
        }
        assert!(
            self.count > 0,
            "{cell} marked as a mine but {self} already accounts for every mine"
        );
        self.count -= 1;
        true
    }

    /// Removes a cell now known to be safe. Returns whether the constraint changed.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        if !self.cells.remove(&cell) {
            return false;
        }
        assert!(
            self.count <= self.cells.len(),
            "{cell} marked as safe but {self} needs every remaining cell to be a mine"
        );
        true
    }

    /// Subset rule: when `self ⊂ other`, the cells of `other` outside `self`
    /// hold exactly `other.count - self.count` mines.
    ///
    /// Returns `None` when `self` is not a subset of `other` or the difference is empty.
    pub fn resolve_against(&self, other: &Constraint) -> Option<Constraint> {
        if !self.cells.is_subset(&other.cells) {
            return None;
        }
        let cells: BTreeSet<Cell> = other.cells.difference(&self.cells).copied().collect();
        if cells.is_empty() {
            return None;
        }
        let count = other.count.checked_sub(self.count).unwrap_or_else(|| {
            panic!("{self} is contained in {other} but claims more mines")
        });
        Some(Constraint::new(cells, count))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn test_derived_mines_when_count_fills_cells() {
        let s = Constraint::new([c(0, 0), c(0, 1), c(1, 0)], 3);
        assert_eq!(s.derived_mines().len(), 3);
        assert!(s.derived_safes().is_empty());
    }

    #[test]
    fn test_derived_safes_when_count_is_zero() {
        let s = Constraint::new([c(0, 0), c(0, 1)], 0);
        assert_eq!(s.derived_safes(), BTreeSet::from([c(0, 0), c(0, 1)]));
        assert!(s.derived_mines().is_empty());
    }

    #[test]
    fn test_nothing_derived_when_undetermined() {
        let s = Constraint::new([c(0, 0), c(0, 1), c(0, 2)], 1);
        assert!(s.derived_mines().is_empty());
        assert!(s.derived_safes().is_empty());
    }

    #[test]
    fn test_derivations_are_pure() {
        let s = Constraint::new([c(0, 0), c(0, 1)], 2);
        let before = s.clone();
        let _ = s.derived_mines();
        let _ = s.derived_safes();
        assert_eq!(s, before);
    }

    #[test]
    fn test_mark_mine_decrements_count() {
        let mut s = Constraint::new([c(0, 0), c(0, 1), c(0, 2)], 2);
        assert!(s.mark_mine(c(0, 1)));
        assert_eq!(s, Constraint::new([c(0, 0), c(0, 2)], 1));

        // Absent cell is a no-op
        assert!(!s.mark_mine(c(5, 5)));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn test_mark_safe_keeps_count() {
        let mut s = Constraint::new([c(0, 0), c(0, 1), c(0, 2)], 1);
        assert!(s.mark_safe(c(0, 0)));
        assert_eq!(s, Constraint::new([c(0, 1), c(0, 2)], 1));
        assert!(!s.mark_safe(c(0, 0)));
        assert_eq!(s.cells().len(), 2);
    }

    #[test]
    #[should_panic(expected = "constraint claims 3 mines among 2 cells")]
    fn test_new_rejects_impossible_count() {
        Constraint::new([c(0, 0), c(0, 1)], 3);
    }

    #[test]
    #[should_panic(expected = "already accounts for every mine")]
    fn test_mark_mine_on_zero_constraint_panics() {
        let mut s = Constraint::new([c(0, 0), c(0, 1)], 0);
        s.mark_mine(c(0, 0));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = Constraint::new([c(0, 0), c(1, 1)], 1);
        let b = Constraint::new([c(1, 1), c(0, 0)], 1);
        assert_eq!(a, b);
        assert_ne!(a, Constraint::new([c(0, 0), c(1, 1)], 2));
    }

    #[test]
    fn test_resolve_against_superset() {
        // {A,B,C} = 1 and {A,B,C,D,E} = 2 give {D,E} = 1
        let small = Constraint::new([c(0, 0), c(0, 1), c(0, 2)], 1);
        let big = Constraint::new([c(0, 0), c(0, 1), c(0, 2), c(1, 0), c(1, 1)], 2);
        assert_eq!(
            small.resolve_against(&big),
            Some(Constraint::new([c(1, 0), c(1, 1)], 1))
        );
        assert_eq!(big.resolve_against(&small), None);
        assert_eq!(small.resolve_against(&small.clone()), None);
    }

    #[test]
    fn test_display() {
        let s = Constraint::new([c(0, 2), c(0, 1)], 1);
        assert_eq!(s.to_string(), "{(0, 1), (0, 2)} = 1");
    }
}
