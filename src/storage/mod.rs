//! Snapshot persistence for [`FinanceState`].

pub mod json_backend;
pub mod memory;

use std::collections::BTreeSet;

use crate::{
    errors::LedgerError,
    ledger::{FinanceState, CURRENT_SCHEMA_VERSION},
};

pub use json_backend::{BackupInfo, JsonStateStore};
pub use memory::MemoryStore;

/// Durable home of the full finance state, written as one snapshot.
pub trait StateStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<FinanceState>, LedgerError>;
    fn save(&self, state: &FinanceState) -> Result<(), LedgerError>;
}

/// Outcome of checking a freshly loaded snapshot.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub state: FinanceState,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

/// Rejects snapshots from a newer schema, restores missing month slots and
/// reports transactions whose category is not registered.
pub fn inspect(mut state: FinanceState) -> Result<LoadReport, LedgerError> {
    if state.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::UnsupportedSchema {
            found: state.schema_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    let mut migrations = Vec::new();
    if state.schema_version < CURRENT_SCHEMA_VERSION {
        migrations.push(format!(
            "snapshot upgraded from schema v{} to v{}",
            state.schema_version, CURRENT_SCHEMA_VERSION
        ));
        state.schema_version = CURRENT_SCHEMA_VERSION;
    }
    let created = state.ensure_all_months();
    if !created.is_empty() {
        let names: Vec<&str> = created.iter().map(|month| month.name()).collect();
        migrations.push(format!("created empty month slots: {}", names.join(", ")));
    }

    let mut unknown = BTreeSet::new();
    for (_, txn) in state.transactions() {
        if !state.categories.contains(&txn.category) {
            unknown.insert(txn.category.clone());
        }
    }
    let warnings = unknown
        .into_iter()
        .map(|name| format!("transactions reference unregistered category `{}`", name))
        .collect();

    Ok(LoadReport {
        state,
        warnings,
        migrations,
    })
}
