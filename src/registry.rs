//! Per-turn action registry
//!
//! The registry is a scratch structure rebuilt at every decision point. The
//! external classifier walks the currently movable pieces and records, for
//! each, the (situational state, action category) pair that moving it would
//! produce. The policy then chooses among the feasible pairs and the registry
//! translates the choice back into a concrete piece.

use crate::types::StateAction;

/// Per-turn mapping from (state, category) pairs to feasibility and to the
/// piece that realizes each pair.
///
/// Both matrices are `states x categories`, row-major. A piece cell is
/// meaningful only where the corresponding feasibility cell is set.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    states: usize,
    categories: usize,
    feasible: Vec<bool>,
    piece: Vec<Option<usize>>,
}

impl ActionRegistry {
    /// Create an empty registry for the given table shape.
    pub fn new(states: usize, categories: usize) -> Self {
        Self {
            states,
            categories,
            feasible: vec![false; states * categories],
            piece: vec![None; states * categories],
        }
    }

    pub fn states(&self) -> usize {
        self.states
    }

    pub fn categories(&self) -> usize {
        self.categories
    }

    /// Clear both matrices back to the unset marker.
    pub fn reset(&mut self) {
        self.feasible.fill(false);
        self.piece.fill(None);
    }

    /// Record that `piece` can realize (state, category) this turn.
    ///
    /// First-writer-wins: if the cell is already set, the call is a no-op.
    /// Which piece wins when two pieces produce the same pair is therefore
    /// whichever the classifier enumerates first; the choice is arbitrary.
    /// Out-of-range indices are ignored.
    pub fn register(&mut self, state: usize, category: usize, piece: usize) {
        let Some(cell) = self.cell(state, category) else {
            return;
        };
        if !self.feasible[cell] {
            self.feasible[cell] = true;
            self.piece[cell] = Some(piece);
        }
    }

    /// Read-only view over the feasibility matrix.
    pub fn feasibility(&self) -> Feasibility<'_> {
        Feasibility {
            states: self.states,
            categories: self.categories,
            cells: &self.feasible,
        }
    }

    /// The piece registered for (state, category), or `None` if the cell is
    /// unset or out of range.
    pub fn piece_for(&self, state: usize, category: usize) -> Option<usize> {
        self.cell(state, category).and_then(|cell| self.piece[cell])
    }

    fn cell(&self, state: usize, category: usize) -> Option<usize> {
        if state < self.states && category < self.categories {
            Some(state * self.categories + category)
        } else {
            None
        }
    }
}

/// Borrowed read-only view of a registry's feasibility matrix.
#[derive(Debug, Clone, Copy)]
pub struct Feasibility<'a> {
    states: usize,
    categories: usize,
    cells: &'a [bool],
}

impl Feasibility<'_> {
    pub fn states(&self) -> usize {
        self.states
    }

    pub fn categories(&self) -> usize {
        self.categories
    }

    pub fn is_feasible(&self, state: usize, category: usize) -> bool {
        state < self.states
            && category < self.categories
            && self.cells[state * self.categories + category]
    }

    /// Iterate over all feasible cells in row-major order.
    pub fn feasible_cells(&self) -> impl Iterator<Item = StateAction> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &set)| set)
            .map(|(idx, _)| StateAction::new(idx / self.categories, idx % self.categories))
    }

    /// True when no cell is feasible (no legal move this turn).
    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }
}
