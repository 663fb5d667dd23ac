//! Business logic helpers for managing the transactions of a month.

use tracing::{debug, warn};

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{
    FinanceState, MonthKey, Transaction, TransactionDraft, TransactionStatus, DEFAULT_CATEGORIES,
};

/// Validated CRUD helpers over the transaction store of one month.
pub struct TransactionService;

impl TransactionService {
    /// Validates `draft`, stores it at the top of `month` and returns the minted id.
    pub fn add(
        state: &mut FinanceState,
        month: MonthKey,
        mut draft: TransactionDraft,
    ) -> ServiceResult<String> {
        Self::validate(&draft.description, draft.amount)?;
        draft.description = draft.description.trim().to_string();
        draft.category = Self::resolve_category(state, &draft.category);
        let id = state.month_mut(month).insert(draft);
        debug!(%month, %id, "transaction inserted");
        Ok(id)
    }

    /// Replaces the transaction carrying the same id and returns the previous version.
    pub fn update(
        state: &mut FinanceState,
        month: MonthKey,
        mut transaction: Transaction,
    ) -> ServiceResult<Transaction> {
        Self::validate(&transaction.description, transaction.amount)?;
        transaction.description = transaction.description.trim().to_string();
        transaction.category = Self::resolve_category(state, &transaction.category);
        let id = transaction.id.clone();
        state
            .month_mut(month)
            .update(transaction)
            .ok_or(ServiceError::TransactionNotFound(id))
    }

    /// Sets the status of `id` and returns the status it had before.
    pub fn set_status(
        state: &mut FinanceState,
        month: MonthKey,
        id: &str,
        status: TransactionStatus,
    ) -> ServiceResult<TransactionStatus> {
        state
            .month_mut(month)
            .set_status(id, status)
            .ok_or_else(|| ServiceError::TransactionNotFound(id.to_string()))
    }

    /// One-step settlement of a pending transaction. Confirming twice is a no-op.
    pub fn confirm(
        state: &mut FinanceState,
        month: MonthKey,
        id: &str,
    ) -> ServiceResult<TransactionStatus> {
        Self::set_status(state, month, id, TransactionStatus::Confirmed)
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(
        state: &mut FinanceState,
        month: MonthKey,
        id: &str,
    ) -> ServiceResult<Transaction> {
        state
            .month_mut(month)
            .remove(id)
            .ok_or_else(|| ServiceError::TransactionNotFound(id.to_string()))
    }

    pub fn list(state: &FinanceState, month: MonthKey) -> &[Transaction] {
        state
            .month(month)
            .map(|ledger| ledger.transactions.as_slice())
            .unwrap_or(&[])
    }

    /// Resolves a unique id from a full id or a prefix of one within `month`.
    pub fn resolve_id(
        state: &FinanceState,
        month: MonthKey,
        needle: &str,
    ) -> ServiceResult<String> {
        let needle = needle.trim();
        if needle.is_empty() {
            return Err(ServiceError::Validation("transaction id is required".into()));
        }
        let transactions = Self::list(state, month);
        if let Some(exact) = transactions.iter().find(|txn| txn.id == needle) {
            return Ok(exact.id.clone());
        }
        let mut matches = transactions.iter().filter(|txn| txn.id.starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(only.id.clone()),
            (Some(_), Some(_)) => Err(ServiceError::Validation(format!(
                "id prefix `{}` matches more than one transaction",
                needle
            ))),
            (None, _) => Err(ServiceError::TransactionNotFound(needle.to_string())),
        }
    }

    fn validate(description: &str, amount: f64) -> ServiceResult<()> {
        if description.trim().is_empty() {
            return Err(ServiceError::Validation("description must not be empty".into()));
        }
        if !amount.is_finite() {
            return Err(ServiceError::Validation("amount must be a number".into()));
        }
        if amount < 0.0 {
            return Err(ServiceError::Validation(
                "amount must not be negative; use the transaction type for direction".into(),
            ));
        }
        Ok(())
    }

    /// Blank categories fall back to the first registered one. Unknown names are
    /// kept as typed since the reference is soft.
    fn resolve_category(state: &FinanceState, requested: &str) -> String {
        let requested = requested.trim();
        if requested.is_empty() {
            return state
                .categories
                .first()
                .map(|category| category.name.clone())
                .unwrap_or_else(|| DEFAULT_CATEGORIES[DEFAULT_CATEGORIES.len() - 1].to_string());
        }
        match state.categories.find(requested) {
            Some(category) => category.name.clone(),
            None => {
                warn!(category = requested, "transaction references an unregistered category");
                requested.to_string()
            }
        }
    }
}
