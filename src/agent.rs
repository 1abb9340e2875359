//! Decision agent: composition root for one independent learner.
//!
//! The agent drives exactly one value table and one reused, turn-scoped
//! action registry. Per turn it asks the classifier to populate the registry,
//! lets the value table pick a feasible (state, category) pair, resolves that
//! pair back to a concrete piece, and later feeds the post-move registry into
//! the Q-learning update.

use crate::{
    error::{Error, Result},
    ports::MoveClassifier,
    q_learning::ValueTable,
    registry::ActionRegistry,
    types::StateAction,
};

/// Single-learner decision engine over a classifier port.
///
/// One instance per independent learner; sharing a value table across
/// concurrently running agents is not supported.
pub struct DecisionAgent<C: MoveClassifier> {
    classifier: C,
    registry: ActionRegistry,
    values: ValueTable,
    /// Pair chosen by the most recent select_piece, awaiting its reward
    pending: Option<StateAction>,
}

impl<C: MoveClassifier> std::fmt::Debug for DecisionAgent<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionAgent")
            .field("registry", &self.registry)
            .field("values", &self.values)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<C: MoveClassifier> DecisionAgent<C> {
    /// Create an agent with a fresh, zeroed value table of the given shape
    /// and default hyperparameters.
    pub fn new(classifier: C, states: usize, categories: usize) -> Self {
        Self::with_value_table(classifier, ValueTable::new(states, categories))
    }

    /// Create an agent around an existing value table (restored snapshot or
    /// custom hyperparameters). The registry takes its shape from the table.
    pub fn with_value_table(classifier: C, values: ValueTable) -> Self {
        Self {
            classifier,
            registry: ActionRegistry::new(values.states(), values.categories()),
            values,
            pending: None,
        }
    }

    /// Pick which piece to move for the current turn.
    ///
    /// Returns `Ok(None)` when no piece can move on this roll; that leaves
    /// no pending decision, so no reward step should follow.
    pub fn select_piece(&mut self, context: &C::Context) -> Result<Option<usize>> {
        self.registry.reset();
        self.classifier.classify(context, &mut self.registry)?;

        let choice = self.values.choose_action(self.registry.feasibility());
        self.pending = choice;

        Ok(choice.and_then(|cell| self.registry.piece_for(cell.state, cell.category)))
    }

    /// Feed the post-move situation back into the value table.
    ///
    /// Must follow a successful [`DecisionAgent::select_piece`] that chose a
    /// piece; calling it with no pending decision is a sequencing bug in the
    /// surrounding orchestration and fails with
    /// [`Error::NoPendingDecision`].
    pub fn apply_reward(&mut self, context: &C::Context) -> Result<()> {
        let choice = self.pending.ok_or(Error::NoPendingDecision)?;

        self.registry.reset();
        self.classifier.classify(context, &mut self.registry)?;
        self.values.update(choice, self.registry.feasibility())?;

        self.pending = None;
        Ok(())
    }

    /// Retune the exploration probability of the underlying value table.
    pub fn set_exploration_rate(&mut self, epsilon: f64) {
        self.values.set_exploration_rate(epsilon);
    }

    /// The pair chosen on the most recent turn, if its reward is still owed.
    pub fn pending_decision(&self) -> Option<StateAction> {
        self.pending
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.values
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}
