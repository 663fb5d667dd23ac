use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    category::CategoryRegistry,
    month::MonthKey,
    month_ledger::MonthLedger,
    transaction::Transaction,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Every month ledger of the year plus the category registry.
///
/// All twelve month slots exist on a freshly created state; snapshots missing
/// some slots are repaired by [`FinanceState::ensure_all_months`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinanceState {
    #[serde(default = "FinanceState::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub months: BTreeMap<MonthKey, MonthLedger>,
    #[serde(default = "CategoryRegistry::seeded")]
    pub categories: CategoryRegistry,
}

impl Default for FinanceState {
    fn default() -> Self {
        Self::new()
    }
}

impl FinanceState {
    pub fn new() -> Self {
        Self::with_categories(CategoryRegistry::seeded())
    }

    pub fn with_categories(categories: CategoryRegistry) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            months: MonthKey::ALL
                .into_iter()
                .map(|month| (month, MonthLedger::new()))
                .collect(),
            categories,
        }
    }

    pub fn month(&self, key: MonthKey) -> Option<&MonthLedger> {
        self.months.get(&key)
    }

    /// Mutable access to a month slot, creating it if a snapshot lacked it.
    pub fn month_mut(&mut self, key: MonthKey) -> &mut MonthLedger {
        self.months.entry(key).or_default()
    }

    /// Re-creates missing month slots and returns the ones that were added.
    pub fn ensure_all_months(&mut self) -> Vec<MonthKey> {
        let mut created = Vec::new();
        for month in MonthKey::ALL {
            if !self.months.contains_key(&month) {
                self.months.insert(month, MonthLedger::new());
                created.push(month);
            }
        }
        created
    }

    pub fn transactions(&self) -> impl Iterator<Item = (MonthKey, &Transaction)> {
        self.months
            .iter()
            .flat_map(|(month, ledger)| ledger.transactions.iter().map(move |txn| (*month, txn)))
    }

    pub fn transaction_count(&self) -> usize {
        self.months.values().map(MonthLedger::len).sum()
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
