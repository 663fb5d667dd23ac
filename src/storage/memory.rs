use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::{errors::LedgerError, ledger::FinanceState};

use super::StateStore;

/// In-process store that keeps the serialized snapshot in memory.
///
/// Clones share the same snapshot, which lets tests keep a handle after
/// giving the store to a manager. `fail_saves` makes every write error out.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Arc<Mutex<Option<String>>>,
    failing: Arc<AtomicBool>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: &FinanceState) -> Result<Self, LedgerError> {
        let store = Self::new();
        store.save(state)?;
        Ok(store)
    }

    pub fn fail_saves(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|count| *count).unwrap_or_default()
    }

    pub fn raw_snapshot(&self) -> Option<String> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<FinanceState>, LedgerError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| LedgerError::Persistence("memory store lock poisoned".into()))?;
        match guard.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &FinanceState) -> Result<(), LedgerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence("storage unavailable".into()));
        }
        let json = serde_json::to_string(state)?;
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| LedgerError::Persistence("memory store lock poisoned".into()))?;
        *guard = Some(json);
        if let Ok(mut count) = self.saves.lock() {
            *count += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_store_keeps_previous_snapshot() {
        let store = MemoryStore::with_state(&FinanceState::new()).unwrap();
        let before = store.raw_snapshot();
        store.fail_saves(true);
        let mut changed = FinanceState::new();
        changed.categories.add("Pets");
        assert!(store.save(&changed).is_err());
        assert_eq!(store.raw_snapshot(), before);
        assert_eq!(store.save_count(), 1);
    }
}
