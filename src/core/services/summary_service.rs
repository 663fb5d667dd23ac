//! Read-only aggregation over the finance state: the carry-over balance chain,
//! per-month headline figures, filtering and the yearly overview.

use std::collections::HashMap;

use crate::ledger::{FinanceState, MonthKey, MonthTotals, Transaction, TransactionKind};

/// Headline figures of one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSummary {
    pub month: MonthKey,
    /// Opening balance imported from the previous month's chain.
    pub carry_amount: f64,
    pub totals: MonthTotals,
    pub transaction_count: usize,
}

impl MonthSummary {
    pub fn confirmed_income(&self) -> f64 {
        self.totals.confirmed_income
    }

    pub fn confirmed_expense(&self) -> f64 {
        self.totals.confirmed_expense
    }

    pub fn pending_income(&self) -> f64 {
        self.totals.pending_income
    }

    pub fn pending_expense(&self) -> f64 {
        self.totals.pending_expense
    }

    /// Confirmed income minus confirmed expense of this month alone.
    pub fn realized(&self) -> f64 {
        self.totals.confirmed_net()
    }

    pub fn net(&self) -> f64 {
        self.carry_amount + self.totals.confirmed_income - self.totals.confirmed_expense
    }

    pub fn projected(&self) -> f64 {
        self.carry_amount + self.totals.total_income() - self.totals.total_expense()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    fn accepts(self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionKind::Income,
            TypeFilter::Expense => kind == TransactionKind::Expense,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub search: String,
    pub kind: TypeFilter,
}

impl TransactionFilter {
    pub fn new(search: impl Into<String>, kind: TypeFilter) -> Self {
        Self {
            search: search.into(),
            kind,
        }
    }
}

/// Income and expense of one month over every status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyFlow {
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Cumulative confirmed net up to and including `target`.
    ///
    /// Walks January..=`target`. Every month after January whose own
    /// carry-over flag is off starts the accumulation again from zero before
    /// adding its net. Pending transactions never enter the chain, and a
    /// missing month slot contributes nothing.
    pub fn balance_chain(state: &FinanceState, target: MonthKey) -> f64 {
        target.through().fold(0.0, |cumulative, month| {
            let Some(ledger) = state.month(month) else {
                return cumulative;
            };
            let opening = if !month.is_first() && !ledger.carries_over() {
                0.0
            } else {
                cumulative
            };
            opening + ledger.totals().confirmed_net()
        })
    }

    /// Opening balance of `month`: the chain of the previous month when this
    /// month carries over, zero otherwise (always zero for January).
    pub fn carry_amount(state: &FinanceState, month: MonthKey) -> f64 {
        let carries = state
            .month(month)
            .map(|ledger| ledger.carries_over())
            .unwrap_or(false);
        match month.previous() {
            Some(previous) if carries => Self::balance_chain(state, previous),
            _ => 0.0,
        }
    }

    pub fn month_summary(state: &FinanceState, month: MonthKey) -> MonthSummary {
        let (totals, transaction_count) = state
            .month(month)
            .map(|ledger| (ledger.totals(), ledger.len()))
            .unwrap_or_default();
        MonthSummary {
            month,
            carry_amount: Self::carry_amount(state, month),
            totals,
            transaction_count,
        }
    }

    /// Transactions of `month` matching the search text (description or
    /// category, case-insensitive) and the type filter, in stored order.
    pub fn filter_transactions<'a>(
        state: &'a FinanceState,
        month: MonthKey,
        filter: &TransactionFilter,
    ) -> Vec<&'a Transaction> {
        let needle = filter.search.to_lowercase();
        state
            .month(month)
            .map(|ledger| {
                ledger
                    .transactions
                    .iter()
                    .filter(|txn| filter.kind.accepts(txn.kind) && txn.matches_lowercase(&needle))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Income and expense per month, counting pending and confirmed alike.
    pub fn monthly_flow(state: &FinanceState) -> Vec<MonthlyFlow> {
        MonthKey::ALL
            .into_iter()
            .map(|month| {
                let totals = state.month(month).map(|ledger| ledger.totals()).unwrap_or_default();
                MonthlyFlow {
                    month,
                    income: totals.total_income(),
                    expense: totals.total_expense(),
                }
            })
            .collect()
    }

    /// Largest expense categories across the year, descending, at most `limit`.
    pub fn top_expense_categories(state: &FinanceState, limit: usize) -> Vec<CategoryTotal> {
        let mut order: Vec<&str> = Vec::new();
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for (_, txn) in state.transactions() {
            if txn.kind != TransactionKind::Expense {
                continue;
            }
            let entry = totals.entry(txn.category.as_str()).or_insert_with(|| {
                order.push(txn.category.as_str());
                0.0
            });
            *entry += txn.amount;
        }
        let mut ranked: Vec<CategoryTotal> = order
            .into_iter()
            .map(|name| CategoryTotal {
                name: name.to_string(),
                total: totals.get(name).copied().unwrap_or_default(),
            })
            .collect();
        ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{TransactionDraft, TransactionStatus};
    use chrono::NaiveDate;

    fn add(
        state: &mut FinanceState,
        month: MonthKey,
        amount: f64,
        kind: TransactionKind,
        status: TransactionStatus,
    ) -> String {
        let date = NaiveDate::from_ymd_opt(2025, month.index() as u32 + 1, 1).unwrap();
        state.month_mut(month).insert(
            TransactionDraft::new("entry", amount, kind, "Other", date).with_status(status),
        )
    }

    #[test]
    fn chain_of_empty_state_is_zero() {
        let state = FinanceState::new();
        assert_eq!(SummaryService::balance_chain(&state, MonthKey::December), 0.0);
    }

    #[test]
    fn chain_skips_missing_months_without_breaking() {
        let mut state = FinanceState::new();
        add(
            &mut state,
            MonthKey::January,
            100.0,
            TransactionKind::Income,
            TransactionStatus::Confirmed,
        );
        state.months.remove(&MonthKey::February);
        state.month_mut(MonthKey::March).settings.carry_over_balance = true;
        add(
            &mut state,
            MonthKey::March,
            10.0,
            TransactionKind::Expense,
            TransactionStatus::Confirmed,
        );
        assert_eq!(SummaryService::balance_chain(&state, MonthKey::March), 90.0);
    }

    #[test]
    fn january_flag_never_imports_anything() {
        let mut state = FinanceState::new();
        state.month_mut(MonthKey::January).settings.carry_over_balance = true;
        add(
            &mut state,
            MonthKey::January,
            50.0,
            TransactionKind::Income,
            TransactionStatus::Confirmed,
        );
        let summary = SummaryService::month_summary(&state, MonthKey::January);
        assert_eq!(summary.carry_amount, 0.0);
        assert_eq!(summary.net(), 50.0);
    }

    #[test]
    fn top_categories_rank_expenses_only() {
        let mut state = FinanceState::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let january = state.month_mut(MonthKey::January);
        january.insert(
            TransactionDraft::new("rent", 900.0, TransactionKind::Expense, "Housing", date),
        );
        january.insert(
            TransactionDraft::new("food", 300.0, TransactionKind::Expense, "Food", date),
        );
        january.insert(
            TransactionDraft::new("pay", 5000.0, TransactionKind::Income, "Salary", date),
        );
        state.month_mut(MonthKey::February).insert(
            TransactionDraft::new("market", 700.0, TransactionKind::Expense, "Food", date)
                .with_status(TransactionStatus::Pending),
        );

        let ranked = SummaryService::top_expense_categories(&state, 5);
        assert_eq!(
            ranked,
            vec![
                CategoryTotal { name: "Food".into(), total: 1000.0 },
                CategoryTotal { name: "Housing".into(), total: 900.0 },
            ]
        );
        assert_eq!(SummaryService::top_expense_categories(&state, 1).len(), 1);
    }

    #[test]
    fn search_text_is_matched_verbatim() {
        let mut state = FinanceState::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let march = state.month_mut(MonthKey::March);
        march.insert(
            TransactionDraft::new("Corner  shop", 12.0, TransactionKind::Expense, "Food", date),
        );
        march.insert(
            TransactionDraft::new("Bus", 4.0, TransactionKind::Expense, "Transport", date),
        );

        let spaced = TransactionFilter::new("  ", TypeFilter::All);
        let matches = SummaryService::filter_transactions(&state, MonthKey::March, &spaced);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].description, "Corner  shop");

        let padded = TransactionFilter::new(" bus", TypeFilter::All);
        assert!(SummaryService::filter_transactions(&state, MonthKey::March, &padded).is_empty());
        let empty = TransactionFilter::new("", TypeFilter::Expense);
        assert_eq!(SummaryService::filter_transactions(&state, MonthKey::March, &empty).len(), 2);
    }
}
