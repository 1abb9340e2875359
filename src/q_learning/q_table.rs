//! Value table and the epsilon-greedy / Q-learning algorithms.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    q_learning::rewards::RewardTable,
    registry::Feasibility,
    types::StateAction,
};

pub const DEFAULT_EPSILON: f64 = 0.9;
pub const DEFAULT_GAMMA: f64 = 0.3;
pub const DEFAULT_LEARNING_RATE: f64 = 0.2;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Serializable snapshot of a value table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ValueTableState {
    pub states: usize,
    pub categories: usize,
    pub q_values: Vec<f64>,
    pub rewards: RewardTable,
    pub epsilon: f64,
    pub gamma: f64,
    pub learning_rate: f64,
    pub collected_reward: f64,
    pub rng_seed: Option<u64>,
}

/// Learned scores over (situational state, action category) pairs, together
/// with the exploration policy and the Q-learning update.
///
/// The Q matrix starts at zero, is mutated only by [`ValueTable::update`],
/// and persists across all turns and episodes of a run. Each instance owns
/// its reward table and random source, so independent learners can coexist
/// in one process.
#[derive(Debug, Clone)]
pub struct ValueTable {
    states: usize,
    categories: usize,
    /// Row-major `states x categories` learned scores
    q_values: Vec<f64>,
    rewards: RewardTable,
    epsilon: f64,
    gamma: f64,
    learning_rate: f64,
    /// Running total of collected rewards, for monitoring only
    collected_reward: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl ValueTable {
    /// Create a zeroed value table with the default hyperparameters
    /// (epsilon 0.9, gamma 0.3, learning rate 0.2).
    pub fn new(states: usize, categories: usize) -> Self {
        Self::with_params(
            states,
            categories,
            DEFAULT_EPSILON,
            DEFAULT_GAMMA,
            DEFAULT_LEARNING_RATE,
        )
    }

    /// Create a zeroed value table with explicit hyperparameters.
    pub fn with_params(
        states: usize,
        categories: usize,
        epsilon: f64,
        gamma: f64,
        learning_rate: f64,
    ) -> Self {
        Self {
            states,
            categories,
            q_values: vec![0.0; states * categories],
            rewards: RewardTable::authored(categories),
            epsilon,
            gamma,
            learning_rate,
            collected_reward: 0.0,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Seed the random source for reproducible exploration and tie-breaking.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn states(&self) -> usize {
        self.states
    }

    pub fn categories(&self) -> usize {
        self.categories
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    pub fn exploration_rate(&self) -> f64 {
        self.epsilon
    }

    /// Retune the exploration probability. Takes effect on the next
    /// [`ValueTable::choose_action`] call; there is no built-in decay.
    pub fn set_exploration_rate(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Total reward collected by all updates so far. Diagnostic only.
    pub fn collected_reward(&self) -> f64 {
        self.collected_reward
    }

    /// Learned score for a cell; zero for out-of-range indices.
    pub fn get(&self, state: usize, category: usize) -> f64 {
        self.index(state, category)
            .map(|idx| self.q_values[idx])
            .unwrap_or(0.0)
    }

    /// Overwrite a cell's learned score (snapshot restore, test seeding).
    pub fn set(&mut self, state: usize, category: usize, value: f64) -> Result<()> {
        let idx = self.checked_index(state, category)?;
        self.q_values[idx] = value;
        Ok(())
    }

    /// Epsilon-greedy selection of one feasible (state, category) pair.
    ///
    /// With probability epsilon the choice is uniform over the feasible
    /// cells, ignoring learned scores. Otherwise the choice is uniform over
    /// the feasible cells tied at the maximum learned score; infeasible
    /// cells are excluded from the maximum entirely. Returns `None` when no
    /// cell is feasible (no legal move this turn).
    pub fn choose_action(&mut self, feasibility: Feasibility<'_>) -> Option<StateAction> {
        let feasible: Vec<StateAction> = feasibility.feasible_cells().collect();
        if feasible.is_empty() {
            return None;
        }

        if self.rng.random::<f64>() < self.epsilon {
            // Explore: uniform over feasible cells
            return feasible.choose(&mut self.rng).copied();
        }

        self.exploit(&feasible)
    }

    /// Greedy pick over the feasible cells, breaking score ties uniformly.
    ///
    /// The tie set is derived from the same score vector the maximum was
    /// taken from, so float equality against the extremum is exact.
    fn exploit(&mut self, feasible: &[StateAction]) -> Option<StateAction> {
        let scores: Vec<f64> = feasible
            .iter()
            .map(|cell| self.get(cell.state, cell.category))
            .collect();
        let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<StateAction> = feasible
            .iter()
            .zip(&scores)
            .filter(|&(_, &score)| score == best)
            .map(|(cell, _)| *cell)
            .collect();
        tied.choose(&mut self.rng).copied()
    }

    /// One-step Q-learning update for the chosen cell:
    ///
    /// `Q[s,c] += lr * (R[c] + gamma * max(Q (x) next) - Q[s,c])`
    ///
    /// where `next` is the post-move feasibility matrix with unset cells
    /// zero-filled. The zero fill is deliberate: a position with no legal
    /// continuation contributes a real zero future value, unlike
    /// [`ValueTable::choose_action`] which excludes infeasible cells.
    pub fn update(&mut self, choice: StateAction, next_feasibility: Feasibility<'_>) -> Result<()> {
        let idx = self.checked_index(choice.state, choice.category)?;
        let reward = self.rewards.get(choice.category);
        let future = self.max_zero_filled(next_feasibility);
        let old_q = self.q_values[idx];
        let delta = self.learning_rate * (reward + self.gamma * future - old_q);

        self.collected_reward += reward;
        self.q_values[idx] = old_q + delta;
        Ok(())
    }

    /// Maximum of the elementwise product of the Q matrix with the
    /// zero-filled feasibility mask. Zero for an empty table.
    fn max_zero_filled(&self, feasibility: Feasibility<'_>) -> f64 {
        let mut best = f64::NEG_INFINITY;
        for state in 0..self.states {
            for category in 0..self.categories {
                let masked = if feasibility.is_feasible(state, category) {
                    self.get(state, category)
                } else {
                    0.0
                };
                best = best.max(masked);
            }
        }
        if best == f64::NEG_INFINITY { 0.0 } else { best }
    }

    pub(crate) fn export_state(&self) -> ValueTableState {
        ValueTableState {
            states: self.states,
            categories: self.categories,
            q_values: self.q_values.clone(),
            rewards: self.rewards.clone(),
            epsilon: self.epsilon,
            gamma: self.gamma,
            learning_rate: self.learning_rate,
            collected_reward: self.collected_reward,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: ValueTableState) -> Self {
        Self {
            states: state.states,
            categories: state.categories,
            q_values: state.q_values,
            rewards: state.rewards,
            epsilon: state.epsilon,
            gamma: state.gamma,
            learning_rate: state.learning_rate,
            collected_reward: state.collected_reward,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }

    fn index(&self, state: usize, category: usize) -> Option<usize> {
        if state < self.states && category < self.categories {
            Some(state * self.categories + category)
        } else {
            None
        }
    }

    fn checked_index(&self, state: usize, category: usize) -> Result<usize> {
        self.index(state, category).ok_or(Error::CellOutOfBounds {
            state,
            category,
            states: self.states,
            categories: self.categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ActionRegistry;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 3x2 registry with (1,0) and (2,1) feasible, per-cell pieces 0 and 1.
    fn two_cell_registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new(3, 2);
        registry.register(1, 0, 0);
        registry.register(2, 1, 1);
        registry
    }

    #[test]
    fn empty_feasibility_yields_no_choice() {
        let registry = ActionRegistry::new(3, 2);
        let mut table = ValueTable::new(3, 2).with_seed(7);
        assert_eq!(table.choose_action(registry.feasibility()), None);
    }

    #[test]
    fn chosen_cell_is_always_feasible() {
        let registry = two_cell_registry();
        let mut table = ValueTable::new(3, 2).with_seed(11);

        for _ in 0..200 {
            let choice = table
                .choose_action(registry.feasibility())
                .expect("two cells are feasible");
            assert!(registry.feasibility().is_feasible(choice.state, choice.category));
        }
    }

    #[test]
    fn greedy_choice_returns_the_unique_maximum() {
        let registry = two_cell_registry();
        let mut table = ValueTable::with_params(3, 2, 0.0, 0.3, 0.2).with_seed(3);
        table.set(1, 0, 0.5).unwrap();
        table.set(2, 1, 0.9).unwrap();

        for _ in 0..50 {
            assert_eq!(
                table.choose_action(registry.feasibility()),
                Some(StateAction::new(2, 1))
            );
        }
    }

    #[test]
    fn infeasible_scores_never_leak_into_the_greedy_maximum() {
        // Scores on infeasible cells must never leak into the maximum.
        let mut registry = ActionRegistry::new(3, 2);
        registry.register(1, 0, 0);
        let mut table = ValueTable::with_params(3, 2, 0.0, 0.3, 0.2).with_seed(3);
        table.set(2, 1, 5.0).unwrap();
        table.set(1, 0, -0.2).unwrap();

        assert_eq!(
            table.choose_action(registry.feasibility()),
            Some(StateAction::new(1, 0))
        );
    }

    #[test]
    fn greedy_ties_are_broken_among_tied_cells_only() {
        let mut registry = ActionRegistry::new(3, 2);
        registry.register(0, 0, 0);
        registry.register(1, 0, 1);
        registry.register(2, 1, 2);
        let mut table = ValueTable::with_params(3, 2, 0.0, 0.3, 0.2).with_seed(19);
        table.set(0, 0, 0.7).unwrap();
        table.set(1, 0, 0.7).unwrap();
        table.set(2, 1, 0.1).unwrap();

        let mut saw_first = false;
        let mut saw_second = false;
        for _ in 0..300 {
            let choice = table.choose_action(registry.feasibility()).unwrap();
            match (choice.state, choice.category) {
                (0, 0) => saw_first = true,
                (1, 0) => saw_second = true,
                other => panic!("non-maximal cell {other:?} chosen"),
            }
        }
        assert!(saw_first && saw_second, "both tied cells must be reachable");
    }

    #[test]
    fn full_exploration_is_roughly_uniform_and_ignores_scores() {
        let registry = two_cell_registry();
        let mut table = ValueTable::with_params(3, 2, 1.0, 0.3, 0.2).with_seed(23);
        // A lopsided Q must not bias the explore branch.
        table.set(2, 1, 100.0).unwrap();

        let trials = 2000;
        let mut low_cell = 0;
        for _ in 0..trials {
            let choice = table.choose_action(registry.feasibility()).unwrap();
            if choice == StateAction::new(1, 0) {
                low_cell += 1;
            }
        }
        assert!(
            (850..=1150).contains(&low_cell),
            "explore branch drew the low cell {low_cell} times out of {trials}"
        );
    }

    #[test]
    fn seeded_exploration_is_reproducible() {
        let registry = two_cell_registry();
        let mut first = ValueTable::with_params(3, 2, 1.0, 0.3, 0.2).with_seed(42);
        let mut second = ValueTable::with_params(3, 2, 1.0, 0.3, 0.2).with_seed(42);

        for _ in 0..32 {
            assert_eq!(
                first.choose_action(registry.feasibility()),
                second.choose_action(registry.feasibility())
            );
        }
    }

    #[test]
    fn update_with_no_continuation_uses_a_zero_future_value() {
        // Q[1,0] = 0.2 * (0.4 + 0.3*0 - 0) = 0.08
        let next = ActionRegistry::new(3, 2);
        let mut table = ValueTable::new(3, 2).with_seed(1);

        table
            .update(StateAction::new(1, 0), next.feasibility())
            .unwrap();
        assert!(approx_eq(table.get(1, 0), 0.08));
        assert!(approx_eq(table.collected_reward(), 0.4));
    }

    #[test]
    fn update_moves_the_cell_toward_the_td_target() {
        let mut next = ActionRegistry::new(3, 2);
        next.register(0, 1, 0);
        let mut table = ValueTable::new(3, 2).with_seed(1);
        table.set(0, 1, 0.6).unwrap();
        table.set(1, 0, 0.1).unwrap();

        // target = R[0] + gamma * max(Q (x) next) = 0.4 + 0.3 * 0.6
        let target = 0.4 + 0.3 * 0.6;
        let before = (table.get(1, 0) - target).abs();
        table
            .update(StateAction::new(1, 0), next.feasibility())
            .unwrap();
        let after = (table.get(1, 0) - target).abs();

        assert!(after < before, "update must move the cell toward the target");
        assert!(approx_eq(table.get(1, 0), 0.1 + 0.2 * (target - 0.1)));
    }

    #[test]
    fn zero_learning_rate_makes_update_a_no_op_on_q() {
        let mut next = ActionRegistry::new(3, 2);
        next.register(0, 1, 0);
        let mut table = ValueTable::with_params(3, 2, 0.9, 0.3, 0.0).with_seed(1);
        table.set(1, 0, 0.25).unwrap();

        table
            .update(StateAction::new(1, 0), next.feasibility())
            .unwrap();
        assert!(approx_eq(table.get(1, 0), 0.25));
    }

    #[test]
    fn negative_feasible_scores_do_not_beat_the_zero_fill() {
        // All feasible next cells are negative; the zero-filled infeasible
        // cells dominate the future-value maximum.
        let mut next = ActionRegistry::new(3, 2);
        next.register(0, 1, 0);
        let mut table = ValueTable::new(3, 2).with_seed(1);
        table.set(0, 1, -0.9).unwrap();

        table
            .update(StateAction::new(1, 0), next.feasibility())
            .unwrap();
        // future value is 0.0, not -0.9
        assert!(approx_eq(table.get(1, 0), 0.2 * 0.4));
    }

    #[test]
    fn update_rejects_out_of_range_cells() {
        let next = ActionRegistry::new(3, 2);
        let mut table = ValueTable::new(3, 2);

        let err = table
            .update(StateAction::new(3, 0), next.feasibility())
            .unwrap_err();
        assert!(matches!(err, Error::CellOutOfBounds { state: 3, .. }));
    }

    #[test]
    fn exploration_rate_can_be_retuned_at_any_time() {
        let registry = two_cell_registry();
        let mut table = ValueTable::new(3, 2).with_seed(5);
        table.set(2, 1, 0.9).unwrap();

        table.set_exploration_rate(0.0);
        assert_eq!(table.exploration_rate(), 0.0);
        assert_eq!(
            table.choose_action(registry.feasibility()),
            Some(StateAction::new(2, 1))
        );
    }
}
