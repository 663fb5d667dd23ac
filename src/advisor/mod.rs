//! Month commentary: a digest of the month's figures, the prompt handed to a
//! narrative service and a rule-based service that works offline.

use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::ledger::{MonthKey, MonthTotals, Transaction, TransactionKind};

/// Returned whenever the narrative service fails.
pub const FALLBACK_ADVICE: &str =
    "Could not reach the financial advisor right now. Check the advisor settings and try again.";

/// Returned when the service answers with nothing.
pub const EMPTY_ADVICE: &str = "Analysis finished, but no text was generated.";

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative service unavailable: {0}")]
    Unavailable(String),
    #[error("narrative service returned an error: {0}")]
    Failed(String),
}

pub trait NarrativeService {
    fn narrate(
        &self,
        month: MonthKey,
        transactions: &[Transaction],
    ) -> Result<String, NarrativeError>;
}

/// Figures of a single month, ignoring any carried balance.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthDigest {
    pub month: MonthKey,
    pub totals: MonthTotals,
    pub lines: Vec<String>,
}

impl MonthDigest {
    pub fn new(month: MonthKey, transactions: &[Transaction]) -> Self {
        let lines = transactions
            .iter()
            .map(|txn| {
                format!(
                    "{}: {:.2} ({}, {})",
                    txn.description,
                    txn.amount,
                    txn.kind.label(),
                    if txn.is_confirmed() { "realized" } else { "pending" }
                )
            })
            .collect();
        Self {
            month,
            totals: MonthTotals::from_transactions(transactions),
            lines,
        }
    }

    /// Confirmed income minus confirmed expense.
    pub fn balance_today(&self) -> f64 {
        self.totals.confirmed_net()
    }

    /// Every income minus every expense, pending included.
    pub fn month_end_projection(&self) -> f64 {
        self.totals.total_income() - self.totals.total_expense()
    }
}

/// Prompt for a language-model backed [`NarrativeService`].
pub fn build_prompt(digest: &MonthDigest) -> String {
    let totals = &digest.totals;
    format!(
        "As a strategic financial mentor, analyse the month of {month}.\n\
         Current figures:\n\
         - Received (cash in hand): {received:.2}\n\
         - Paid (settled bills): {paid:.2}\n\
         - Real balance today: {today:.2}\n\
         - Expected income (pending): {pending_in:.2}\n\
         - Bills to pay (pending): {pending_out:.2}\n\
         - Month-end projection: {projection:.2}\n\
         \n\
         Detailed transactions: {lines}\n\
         \n\
         Give a short, direct analysis split into:\n\
         1. DIAGNOSIS: how does the real financial health compare with the projected one?\n\
         2. ALERT: which pending bills are the most dangerous, \
         or which incomes are opportunities?\n\
         3. ACTION PLAN: what should the user do NOW to improve the projected balance?\n\
         \n\
         Use an executive, encouraging and professional tone.",
        month = digest.month,
        received = totals.confirmed_income,
        paid = totals.confirmed_expense,
        today = digest.balance_today(),
        pending_in = totals.pending_income,
        pending_out = totals.pending_expense,
        projection = digest.month_end_projection(),
        lines = digest.lines.join(", "),
    )
}

/// Asks `service` about `month`, degrading every failure to fixed text.
pub fn advise(
    service: &dyn NarrativeService,
    month: MonthKey,
    transactions: &[Transaction],
) -> String {
    match service.narrate(month, transactions) {
        Ok(text) if text.trim().is_empty() => EMPTY_ADVICE.to_string(),
        Ok(text) => text,
        Err(err) => {
            warn!(%month, error = %err, "narrative service failed");
            FALLBACK_ADVICE.to_string()
        }
    }
}

/// Rule-based commentary computed locally from the month digest.
#[derive(Debug, Clone, Default)]
pub struct OfflineAdvisor {
    config: Config,
}

impl OfflineAdvisor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn diagnosis(&self, digest: &MonthDigest) -> String {
        let today = digest.balance_today();
        let projected = digest.month_end_projection();
        let money = |amount| self.config.format_money(amount);
        match (today >= 0.0, projected >= 0.0) {
            (true, true) => format!(
                "Healthy. You hold {} today and should close the month at {}.",
                money(today),
                money(projected)
            ),
            (true, false) => format!(
                "Positive today at {}, but pending bills drag the month-end projection to {}.",
                money(today),
                money(projected)
            ),
            (false, true) => format!(
                "Negative today at {}, recovering to {} once pending income arrives.",
                money(today),
                money(projected)
            ),
            (false, false) => format!(
                "Under pressure. Today's balance is {} and the month-end projection is {}.",
                money(today),
                money(projected)
            ),
        }
    }

    fn alert(&self, transactions: &[Transaction]) -> String {
        let largest = |kind: TransactionKind| {
            transactions
                .iter()
                .filter(|txn| txn.kind == kind && !txn.is_confirmed())
                .max_by(|a, b| a.amount.total_cmp(&b.amount))
        };
        match (largest(TransactionKind::Expense), largest(TransactionKind::Income)) {
            (None, None) => "Nothing pending. Every transaction of the month is settled.".into(),
            (Some(bill), None) => format!(
                "Largest pending bill: {} ({}).",
                bill.description,
                self.config.format_money(bill.amount)
            ),
            (None, Some(income)) => format!(
                "Pending income to chase: {} ({}).",
                income.description,
                self.config.format_money(income.amount)
            ),
            (Some(bill), Some(income)) => format!(
                "Largest pending bill: {} ({}). Pending income to chase: {} ({}).",
                bill.description,
                self.config.format_money(bill.amount),
                income.description,
                self.config.format_money(income.amount)
            ),
        }
    }

    fn action_plan(&self, digest: &MonthDigest) -> String {
        let totals = &digest.totals;
        if digest.month_end_projection() < 0.0 {
            format!(
                "Cut or postpone {} of pending expenses before they are due.",
                self.config.format_money(-digest.month_end_projection())
            )
        } else if totals.pending_income > 0.0 {
            "Confirm pending income as soon as it lands so the real balance matches the plan."
                .into()
        } else if totals.confirmed_income > 0.0
            && totals.confirmed_expense > totals.confirmed_income * 0.8
        {
            "Spending is above 80% of income. Review the largest categories for savings.".into()
        } else {
            "Keep the pace and move part of the surplus into savings.".into()
        }
    }
}

impl NarrativeService for OfflineAdvisor {
    fn narrate(
        &self,
        month: MonthKey,
        transactions: &[Transaction],
    ) -> Result<String, NarrativeError> {
        let digest = MonthDigest::new(month, transactions);
        Ok(format!(
            "1. DIAGNOSIS: {}\n2. ALERT: {}\n3. ACTION PLAN: {}",
            self.diagnosis(&digest),
            self.alert(transactions),
            self.action_plan(&digest)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{TransactionDraft, TransactionStatus};
    use chrono::NaiveDate;

    struct Offline;

    impl NarrativeService for Offline {
        fn narrate(&self, _: MonthKey, _: &[Transaction]) -> Result<String, NarrativeError> {
            Err(NarrativeError::Unavailable("no network".into()))
        }
    }

    struct Silent;

    impl NarrativeService for Silent {
        fn narrate(&self, _: MonthKey, _: &[Transaction]) -> Result<String, NarrativeError> {
            Ok("  ".into())
        }
    }

    fn sample() -> Vec<Transaction> {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        vec![
            Transaction::from_draft(TransactionDraft::new(
                "Salary",
                3000.0,
                TransactionKind::Income,
                "Salary",
                date,
            )),
            Transaction::from_draft(
                TransactionDraft::new("Rent", 1200.0, TransactionKind::Expense, "Housing", date)
                    .with_status(TransactionStatus::Pending),
            ),
        ]
    }

    #[test]
    fn failures_degrade_to_fixed_text() {
        assert_eq!(advise(&Offline, MonthKey::June, &sample()), FALLBACK_ADVICE);
        assert_eq!(advise(&Silent, MonthKey::June, &sample()), EMPTY_ADVICE);
    }

    #[test]
    fn prompt_carries_figures_and_sections() {
        let digest = MonthDigest::new(MonthKey::June, &sample());
        let prompt = build_prompt(&digest);
        assert!(prompt.contains("June"));
        assert!(prompt.contains("Real balance today: 3000.00"));
        assert!(prompt.contains("Month-end projection: 1800.00"));
        assert!(prompt.contains("Rent: 1200.00 (expense, pending)"));
        assert!(prompt.contains("ACTION PLAN"));
    }

    #[test]
    fn offline_advisor_names_pending_bill() {
        let text = advise(&OfflineAdvisor::default(), MonthKey::June, &sample());
        assert!(text.starts_with("1. DIAGNOSIS: Healthy"));
        assert!(text.contains("Largest pending bill: Rent"));
    }
}
