//! Per-run callback index

use std::collections::HashMap;
use stratum_core::{CallbackKind, Migration, CALLBACK_KINDS};

/// Maps each of the twelve callback kinds to the parsed migrations
/// carrying that kind.
///
/// Built once per run over the entire migration set: callbacks are
/// global to the run, not scoped to the directory of the migration
/// being applied.
#[derive(Debug, Default)]
pub struct CallbackIndex {
    by_kind: HashMap<CallbackKind, Vec<Migration>>,
}

impl CallbackIndex {
    /// Index every callback migration in the set.
    pub fn build(migrations: &[Migration]) -> Self {
        let mut by_kind: HashMap<CallbackKind, Vec<Migration>> = CALLBACK_KINDS
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();

        for migration in migrations {
            if let Some(kind) = migration.kind.callback() {
                by_kind
                    .entry(kind)
                    .or_default()
                    .push(migration.clone());
            }
        }

        Self { by_kind }
    }

    /// Callbacks registered for a lifecycle hook, in discovery order.
    pub fn get(&self, kind: CallbackKind) -> &[Migration] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "callback_index_test.rs"]
mod tests;
