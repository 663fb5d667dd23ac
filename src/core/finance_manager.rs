use tracing::{debug, info, warn};

use crate::core::services::{
    CategoryService, CategoryTotal, MonthService, MonthSummary, MonthlyFlow, ServiceResult,
    SummaryService, TransactionFilter, TransactionService,
};
use crate::errors::LedgerError;
use crate::ledger::{
    Category, FinanceState, MonthKey, Transaction, TransactionDraft, TransactionStatus,
};
use crate::storage::{self, LoadReport, StateStore};

const DEFAULT_SAVE_RETRIES: u32 = 2;

/// Value produced by an applied mutation, plus the save error when the
/// snapshot write was deferred.
#[must_use]
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub deferred: Option<LedgerError>,
}

impl<T> Committed<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            deferred: None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Facade that owns the finance state and writes a full snapshot to its
/// store after every successful mutation.
///
/// A failed write never rolls the change back. The manager stays dirty and
/// the returned [`Committed`] carries [`LedgerError::PersistenceDeferred`]
/// next to the produced value; the next mutation or
/// [`FinanceManager::flush`] writes the snapshot again.
pub struct FinanceManager {
    state: FinanceState,
    store: Box<dyn StateStore>,
    dirty: bool,
    save_retries: u32,
}

impl FinanceManager {
    /// Loads the stored snapshot, or starts from a fresh state when the
    /// store is empty.
    pub fn open(store: Box<dyn StateStore>) -> Result<(Self, LoadReport), LedgerError> {
        let report = match store.load()? {
            Some(state) => storage::inspect(state)?,
            None => {
                info!("no stored snapshot; starting with an empty year");
                LoadReport {
                    state: FinanceState::new(),
                    warnings: Vec::new(),
                    migrations: Vec::new(),
                }
            }
        };
        for note in &report.migrations {
            info!(migration = %note, "snapshot repaired on load");
        }
        for warning in &report.warnings {
            warn!(%warning, "snapshot loaded with warnings");
        }
        let manager = Self {
            state: report.state.clone(),
            store,
            dirty: !report.migrations.is_empty(),
            save_retries: DEFAULT_SAVE_RETRIES,
        };
        Ok((manager, report))
    }

    pub fn with_save_retries(mut self, retries: u32) -> Self {
        self.save_retries = retries;
        self
    }

    pub fn state(&self) -> &FinanceState {
        &self.state
    }

    /// True while the in-memory state holds changes the store has not accepted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add_transaction(
        &mut self,
        month: MonthKey,
        draft: TransactionDraft,
    ) -> ServiceResult<Committed<String>> {
        let id = TransactionService::add(&mut self.state, month, draft)?;
        info!(%month, %id, "transaction added");
        Ok(self.commit(id))
    }

    pub fn update_transaction(
        &mut self,
        month: MonthKey,
        transaction: Transaction,
    ) -> ServiceResult<Committed<Transaction>> {
        let previous = TransactionService::update(&mut self.state, month, transaction)?;
        info!(%month, id = %previous.id, "transaction updated");
        Ok(self.commit(previous))
    }

    pub fn set_status(
        &mut self,
        month: MonthKey,
        id: &str,
        status: TransactionStatus,
    ) -> ServiceResult<Committed<TransactionStatus>> {
        let previous = TransactionService::set_status(&mut self.state, month, id, status)?;
        if previous == status && !self.dirty {
            debug!(%month, id, "status unchanged");
            return Ok(Committed::clean(previous));
        }
        info!(%month, id, status = status.label(), "transaction status changed");
        Ok(self.commit(previous))
    }

    pub fn confirm_transaction(
        &mut self,
        month: MonthKey,
        id: &str,
    ) -> ServiceResult<Committed<TransactionStatus>> {
        self.set_status(month, id, TransactionStatus::Confirmed)
    }

    pub fn remove_transaction(
        &mut self,
        month: MonthKey,
        id: &str,
    ) -> ServiceResult<Committed<Transaction>> {
        let removed = TransactionService::remove(&mut self.state, month, id)?;
        info!(%month, id, "transaction removed");
        Ok(self.commit(removed))
    }

    /// Sets the carry-over flag and returns the previous value.
    pub fn set_carry_over(
        &mut self,
        month: MonthKey,
        enabled: bool,
    ) -> ServiceResult<Committed<bool>> {
        let previous = MonthService::set_carry_over(&mut self.state, month, enabled);
        if previous == enabled && !self.dirty {
            return Ok(Committed::clean(previous));
        }
        Ok(self.commit(previous))
    }

    /// Flips the carry-over flag and returns the new value.
    pub fn toggle_carry_over(&mut self, month: MonthKey) -> ServiceResult<Committed<bool>> {
        let enabled = MonthService::toggle_carry_over(&mut self.state, month);
        Ok(self.commit(enabled))
    }

    pub fn carries_over(&self, month: MonthKey) -> bool {
        MonthService::carries_over(&self.state, month)
    }

    pub fn add_category(&mut self, name: &str) -> ServiceResult<Committed<Category>> {
        let known = self.state.categories.len();
        let category = CategoryService::add(&mut self.state, name)?;
        if self.state.categories.len() == known && !self.dirty {
            return Ok(Committed::clean(category));
        }
        info!(category = %category.name, "category registered");
        Ok(self.commit(category))
    }

    pub fn categories(&self) -> Vec<&Category> {
        CategoryService::list(&self.state)
    }

    /// Swaps in a whole state, for example one restored from a backup.
    pub fn replace_state(&mut self, state: FinanceState) -> ServiceResult<Committed<()>> {
        let report = storage::inspect(state)?;
        self.state = report.state;
        info!(transactions = self.state.transaction_count(), "state replaced");
        Ok(self.commit(()))
    }

    /// Retries the snapshot write for changes a previous save deferred.
    pub fn flush(&mut self) -> Result<(), LedgerError> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    pub fn transactions(&self, month: MonthKey) -> &[Transaction] {
        TransactionService::list(&self.state, month)
    }

    pub fn resolve_id(&self, month: MonthKey, needle: &str) -> ServiceResult<String> {
        TransactionService::resolve_id(&self.state, month, needle)
    }

    pub fn month_summary(&self, month: MonthKey) -> MonthSummary {
        SummaryService::month_summary(&self.state, month)
    }

    pub fn balance_chain(&self, month: MonthKey) -> f64 {
        SummaryService::balance_chain(&self.state, month)
    }

    pub fn carry_amount(&self, month: MonthKey) -> f64 {
        SummaryService::carry_amount(&self.state, month)
    }

    pub fn filter_transactions(
        &self,
        month: MonthKey,
        filter: &TransactionFilter,
    ) -> Vec<&Transaction> {
        SummaryService::filter_transactions(&self.state, month, filter)
    }

    pub fn monthly_flow(&self) -> Vec<MonthlyFlow> {
        SummaryService::monthly_flow(&self.state)
    }

    pub fn top_expense_categories(&self, limit: usize) -> Vec<CategoryTotal> {
        SummaryService::top_expense_categories(&self.state, limit)
    }

    fn commit<T>(&mut self, value: T) -> Committed<T> {
        self.dirty = true;
        Committed {
            value,
            deferred: self.persist().err(),
        }
    }

    fn persist(&mut self) -> Result<(), LedgerError> {
        let attempts = self.save_retries.saturating_add(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match self.store.save(&self.state) {
                Ok(()) => {
                    self.dirty = false;
                    debug!(attempt, "snapshot saved");
                    return Ok(());
                }
                Err(err) => {
                    warn!(attempt, attempts, error = %err, "snapshot save failed");
                    last_error = err.to_string();
                }
            }
        }
        warn!(attempts, "snapshot save deferred; changes kept in memory");
        Err(LedgerError::PersistenceDeferred {
            attempts,
            reason: last_error,
        })
    }
}
