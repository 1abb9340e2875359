//! Snapshot support for trained value tables.
//!
//! The engine itself never touches the filesystem during play; these helpers
//! exist so a surrounding layer can checkpoint a learner between runs.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::q_learning::q_table::{ValueTable, ValueTableState};

/// Versioned, serializable snapshot of a [`ValueTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedValueTable {
    pub version: u32,
    state: ValueTableState,
}

impl SavedValueTable {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &ValueTable) -> Self {
        Self {
            version: Self::VERSION,
            state: table.export_state(),
        }
    }

    pub fn into_table(self) -> Result<ValueTable> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported value table snapshot version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok(ValueTable::from_state(self.state))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("create snapshot file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("write snapshot to {}", path.display()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("open snapshot file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parse snapshot from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::ActionRegistry, types::StateAction};

    #[test]
    fn snapshot_roundtrip_preserves_learning_state() {
        let next = ActionRegistry::new(3, 2);
        let mut table = ValueTable::with_params(3, 2, 0.5, 0.3, 0.2).with_seed(42);
        table
            .update(StateAction::new(1, 0), next.feasibility())
            .unwrap();

        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("value_table.json");
        SavedValueTable::from_table(&table).save(&path).unwrap();

        let restored = SavedValueTable::load(&path).unwrap().into_table().unwrap();
        assert_eq!(restored.states(), 3);
        assert_eq!(restored.categories(), 2);
        assert_eq!(restored.get(1, 0), table.get(1, 0));
        assert_eq!(restored.collected_reward(), table.collected_reward());
        assert_eq!(restored.exploration_rate(), 0.5);
    }

    #[test]
    fn restored_seed_reproduces_the_choice_sequence() {
        let mut registry = ActionRegistry::new(3, 2);
        registry.register(1, 0, 0);
        registry.register(2, 1, 1);

        let table = ValueTable::with_params(3, 2, 1.0, 0.3, 0.2).with_seed(7);
        let mut fresh = table.clone();
        let mut restored = SavedValueTable::from_table(&table).into_table().unwrap();

        for _ in 0..16 {
            assert_eq!(
                fresh.choose_action(registry.feasibility()),
                restored.choose_action(registry.feasibility())
            );
        }
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let table = ValueTable::new(2, 2);
        let mut saved = SavedValueTable::from_table(&table);
        saved.version = 99;
        assert!(saved.into_table().is_err());
    }
}
