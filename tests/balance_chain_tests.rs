mod common;

use common::{pending, quarter_state};
use finance_core::{
    core::services::SummaryService,
    ledger::{MonthKey, TransactionKind},
};

#[test]
fn january_realized_balance() {
    let state = quarter_state();
    assert_eq!(SummaryService::balance_chain(&state, MonthKey::January), 600.0);
}

#[test]
fn february_inherits_january() {
    let state = quarter_state();
    assert_eq!(SummaryService::balance_chain(&state, MonthKey::February), 500.0);
    assert_eq!(SummaryService::carry_amount(&state, MonthKey::February), 600.0);
}

#[test]
fn march_without_carry_breaks_the_chain() {
    let state = quarter_state();
    assert_eq!(SummaryService::balance_chain(&state, MonthKey::March), 50.0);
    assert_eq!(SummaryService::carry_amount(&state, MonthKey::March), 0.0);
}

#[test]
fn chain_resumes_after_a_break() {
    let mut state = quarter_state();
    state.month_mut(MonthKey::April).settings.carry_over_balance = true;
    assert_eq!(SummaryService::balance_chain(&state, MonthKey::April), 50.0);
    assert_eq!(SummaryService::month_summary(&state, MonthKey::April).net(), 50.0);
}

#[test]
fn pending_entries_never_reach_the_chain() {
    let mut state = quarter_state();
    let before: Vec<f64> = MonthKey::ALL
        .iter()
        .map(|month| SummaryService::balance_chain(&state, *month))
        .collect();

    state.month_mut(MonthKey::February).insert(pending(
        "Car repair",
        9999.0,
        TransactionKind::Expense,
        MonthKey::February,
    ));

    let after: Vec<f64> = MonthKey::ALL
        .iter()
        .map(|month| SummaryService::balance_chain(&state, *month))
        .collect();
    assert_eq!(before, after);

    let february = SummaryService::month_summary(&state, MonthKey::February);
    assert_eq!(february.net(), 500.0);
    assert_eq!(february.projected(), 500.0 - 9999.0);
}

#[test]
fn isolated_month_ignores_history() {
    let mut state = quarter_state();
    // A month that does not carry over depends only on itself.
    let isolated = SummaryService::balance_chain(&state, MonthKey::March);
    state
        .month_mut(MonthKey::January)
        .insert(common::confirmed("Bonus", 5000.0, TransactionKind::Income, MonthKey::January));
    assert_eq!(SummaryService::balance_chain(&state, MonthKey::March), isolated);
}

#[test]
fn carry_amount_is_previous_chain_for_every_carrying_month() {
    let mut state = quarter_state();
    for month in MonthKey::ALL {
        state.month_mut(month).settings.carry_over_balance = true;
    }
    for month in MonthKey::ALL.into_iter().skip(1) {
        let previous = month.previous().expect("has previous");
        assert_eq!(
            SummaryService::carry_amount(&state, month),
            SummaryService::balance_chain(&state, previous),
            "carry of {month}"
        );
    }
    assert_eq!(SummaryService::carry_amount(&state, MonthKey::January), 0.0);
    assert_eq!(SummaryService::balance_chain(&state, MonthKey::December), 550.0);
}
