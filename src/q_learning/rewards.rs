//! Hand-authored reward table for Ludo move outcomes.
//!
//! Rewards are authored once per [`MoveKind`] for the safe zone, then shifted
//! by a fixed delta for the unsafe and home variants of the same outcome.

use serde::{Deserialize, Serialize};

use crate::types::{ActionCategory, MoveKind, Zone};

const VERY_BAD: f64 = -0.8;
const BAD: f64 = -0.4;
const GOOD: f64 = 0.4;
const VERY_GOOD: f64 = 1.2;

fn safe_base(kind: MoveKind) -> f64 {
    match kind {
        MoveKind::MoveOut => 0.4,
        MoveKind::MoveDice => 0.01,
        MoveKind::Goal => 0.8,
        MoveKind::Star => 0.8,
        MoveKind::Globe => 0.4,
        MoveKind::Protect => 0.2,
        MoveKind::Kill => 1.5,
        MoveKind::Die => -0.5,
        MoveKind::GoalZone => 0.2,
    }
}

fn zone_delta(category: ActionCategory) -> f64 {
    match category.zone {
        Zone::Safe => 0.0,
        Zone::Unsafe => match category.kind {
            MoveKind::MoveOut | MoveKind::MoveDice | MoveKind::Star => BAD,
            MoveKind::Die => VERY_BAD,
            _ => GOOD,
        },
        Zone::Home => match category.kind {
            MoveKind::MoveOut => VERY_GOOD,
            _ => VERY_BAD,
        },
    }
}

/// Immutable per-category reward vector.
///
/// Built fresh for each value table instance so that independent learners in
/// the same process never alias reward storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardTable {
    values: Vec<f64>,
}

impl RewardTable {
    /// Authored rewards for the first `categories` columns.
    ///
    /// Columns beyond the authored set (27 zone-qualified outcomes) are zero;
    /// a smaller table keeps the authored prefix.
    pub fn authored(categories: usize) -> Self {
        let mut values = vec![0.0; categories];
        for category in ActionCategory::all() {
            let idx = category.index();
            if idx < categories {
                values[idx] = safe_base(category.kind) + zone_delta(category);
            }
        }
        Self { values }
    }

    /// Reward for a column index; zero beyond the table.
    pub fn get(&self, category: usize) -> f64 {
        self.values.get(category).copied().unwrap_or(0.0)
    }

    /// Reward for a zone-qualified outcome.
    pub fn for_category(&self, category: ActionCategory) -> f64 {
        self.get(category.index())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
