use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthSettings {
    /// Whether this month imports the running balance of the month before it.
    #[serde(default)]
    pub carry_over_balance: bool,
}

/// Transactions of a single month (newest first) plus its settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthLedger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub settings: MonthSettings,
}

impl MonthLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints an id for `draft`, prepends the transaction and returns the id.
    pub fn insert(&mut self, draft: TransactionDraft) -> String {
        let transaction = Transaction::from_draft(draft);
        let id = transaction.id.clone();
        self.transactions.insert(0, transaction);
        id
    }

    /// Replaces the stored transaction with the same id, returning the old one.
    pub fn update(&mut self, transaction: Transaction) -> Option<Transaction> {
        let slot = self.transaction_mut(&transaction.id)?;
        Some(std::mem::replace(slot, transaction))
    }

    /// Sets the status of `id`, returning the status it had before.
    pub fn set_status(&mut self, id: &str, status: TransactionStatus) -> Option<TransactionStatus> {
        let slot = self.transaction_mut(id)?;
        Some(std::mem::replace(&mut slot.status, status))
    }

    pub fn remove(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: &str) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn carries_over(&self) -> bool {
        self.settings.carry_over_balance
    }

    pub fn totals(&self) -> MonthTotals {
        MonthTotals::from_transactions(&self.transactions)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Sums of a month's transactions partitioned by `(kind, status)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthTotals {
    pub confirmed_income: f64,
    pub confirmed_expense: f64,
    pub pending_income: f64,
    pub pending_expense: f64,
}

impl MonthTotals {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, txn| {
                let bucket = match (txn.kind, txn.status) {
                    (TransactionKind::Income, TransactionStatus::Confirmed) => {
                        &mut totals.confirmed_income
                    }
                    (TransactionKind::Expense, TransactionStatus::Confirmed) => {
                        &mut totals.confirmed_expense
                    }
                    (TransactionKind::Income, TransactionStatus::Pending) => {
                        &mut totals.pending_income
                    }
                    (TransactionKind::Expense, TransactionStatus::Pending) => {
                        &mut totals.pending_expense
                    }
                };
                *bucket += txn.amount;
                totals
            })
    }

    /// Confirmed income minus confirmed expense. Pending amounts never count here.
    pub fn confirmed_net(&self) -> f64 {
        self.confirmed_income - self.confirmed_expense
    }

    pub fn total_income(&self) -> f64 {
        self.confirmed_income + self.pending_income
    }

    pub fn total_expense(&self) -> f64 {
        self.confirmed_expense + self.pending_expense
    }
}
