//! Classifier port - boundary to the game's rules engine.
//!
//! The decision engine never inspects the board itself. The surrounding game
//! engine implements this port: given a board context (board layout, dice
//! roll, whose turn it is), it enumerates each currently movable piece and
//! records the (situational state, action category) pair that moving it
//! would produce.

use crate::{error::Result, registry::ActionRegistry};

/// Port implemented by the external rules/classification collaborator.
///
/// Enumeration order is observable: when two pieces produce the same
/// (state, category) pair, the registry keeps whichever was registered
/// first.
pub trait MoveClassifier {
    /// Board context handed through from the surrounding game engine.
    type Context;

    /// Enumerate the movable pieces for `context`, calling
    /// [`ActionRegistry::register`] once per piece with the pair its move
    /// would produce. The registry has already been reset by the caller.
    fn classify(&mut self, context: &Self::Context, registry: &mut ActionRegistry) -> Result<()>;
}
