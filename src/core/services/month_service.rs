use tracing::info;

use crate::ledger::{FinanceState, MonthKey};

/// Per-month settings.
pub struct MonthService;

impl MonthService {
    /// Sets the carry-over flag of `month` and returns the previous value.
    pub fn set_carry_over(state: &mut FinanceState, month: MonthKey, enabled: bool) -> bool {
        let settings = &mut state.month_mut(month).settings;
        let previous = std::mem::replace(&mut settings.carry_over_balance, enabled);
        if previous != enabled {
            info!(%month, enabled, "carry-over updated");
        }
        previous
    }

    /// Flips the carry-over flag of `month` and returns the new value.
    pub fn toggle_carry_over(state: &mut FinanceState, month: MonthKey) -> bool {
        let enabled = !Self::carries_over(state, month);
        Self::set_carry_over(state, month, enabled);
        enabled
    }

    pub fn carries_over(state: &FinanceState, month: MonthKey) -> bool {
        state
            .month(month)
            .map(|ledger| ledger.carries_over())
            .unwrap_or(false)
    }
}
