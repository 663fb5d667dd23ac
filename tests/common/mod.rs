#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use finance_core::{
    core::FinanceManager,
    ledger::{FinanceState, MonthKey, TransactionDraft, TransactionKind, TransactionStatus},
    storage::{JsonStateStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Manager backed by a JSON store in its own temporary directory.
pub fn json_manager() -> (FinanceManager, JsonStateStore) {
    let store = JsonStateStore::new(&temp_base(), Some(3)).expect("create json store");
    let (manager, _) = FinanceManager::open(Box::new(store.clone())).expect("open manager");
    (manager, store)
}

pub fn memory_manager() -> (FinanceManager, MemoryStore) {
    let store = MemoryStore::new();
    let (manager, _) = FinanceManager::open(Box::new(store.clone())).expect("open manager");
    (manager, store)
}

pub fn date_in(month: MonthKey, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month.index() as u32 + 1, day).expect("valid date")
}

pub fn confirmed(
    description: &str,
    amount: f64,
    kind: TransactionKind,
    month: MonthKey,
) -> TransactionDraft {
    TransactionDraft::new(description, amount, kind, "Other", date_in(month, 10))
}

pub fn pending(
    description: &str,
    amount: f64,
    kind: TransactionKind,
    month: MonthKey,
) -> TransactionDraft {
    confirmed(description, amount, kind, month).with_status(TransactionStatus::Pending)
}

/// January through March as in the reference walkthrough: January nets 600,
/// February carries over and spends 100, March breaks the chain with 50.
pub fn quarter_state() -> FinanceState {
    let mut state = FinanceState::new();
    state
        .month_mut(MonthKey::January)
        .insert(confirmed("Salary", 1000.0, TransactionKind::Income, MonthKey::January));
    state
        .month_mut(MonthKey::January)
        .insert(confirmed("Rent", 400.0, TransactionKind::Expense, MonthKey::January));
    state.month_mut(MonthKey::February).settings.carry_over_balance = true;
    state
        .month_mut(MonthKey::February)
        .insert(confirmed("Groceries", 100.0, TransactionKind::Expense, MonthKey::February));
    state
        .month_mut(MonthKey::March)
        .insert(confirmed("Freelance", 50.0, TransactionKind::Income, MonthKey::March));
    state
}
