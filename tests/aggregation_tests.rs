mod common;

use common::{confirmed, memory_manager, pending};
use finance_core::{
    core::services::{ServiceError, TransactionFilter, TypeFilter},
    ledger::{MonthKey, TransactionDraft, TransactionKind, TransactionStatus},
};

#[test]
fn net_and_projected_follow_their_formulas() {
    let (mut manager, _) = memory_manager();
    manager
        .add_transaction(
            MonthKey::May,
            confirmed("Salary", 3000.0, TransactionKind::Income, MonthKey::May),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::May,
            confirmed("Rent", 1200.0, TransactionKind::Expense, MonthKey::May),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::May,
            pending("Refund", 80.0, TransactionKind::Income, MonthKey::May),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::May,
            pending("Insurance", 300.0, TransactionKind::Expense, MonthKey::May),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::April,
            confirmed("Gift", 200.0, TransactionKind::Income, MonthKey::April),
        )
        .unwrap()
        .into_value();
    manager.set_carry_over(MonthKey::May, true).unwrap().into_value();

    let summary = manager.month_summary(MonthKey::May);
    assert_eq!(summary.carry_amount, 200.0);
    assert_eq!(summary.confirmed_income(), 3000.0);
    assert_eq!(summary.confirmed_expense(), 1200.0);
    assert_eq!(summary.pending_income(), 80.0);
    assert_eq!(summary.pending_expense(), 300.0);
    assert_eq!(summary.net(), 200.0 + 3000.0 - 1200.0);
    assert_eq!(summary.projected(), 200.0 + 3080.0 - 1500.0);
    assert_eq!(summary.transaction_count, 4);
}

#[test]
fn confirming_twice_changes_nothing_more() {
    let (mut manager, store) = memory_manager();
    let id = manager
        .add_transaction(
            MonthKey::June,
            pending("Invoice", 500.0, TransactionKind::Income, MonthKey::June),
        )
        .unwrap()
        .into_value();
    assert_eq!(manager.month_summary(MonthKey::June).net(), 0.0);

    assert_eq!(
        manager.confirm_transaction(MonthKey::June, &id).unwrap().into_value(),
        TransactionStatus::Pending
    );
    let once = manager.month_summary(MonthKey::June);
    let saves = store.save_count();

    assert_eq!(
        manager.confirm_transaction(MonthKey::June, &id).unwrap().into_value(),
        TransactionStatus::Confirmed
    );
    assert_eq!(manager.month_summary(MonthKey::June), once);
    assert_eq!(once.net(), 500.0);
    assert_eq!(store.save_count(), saves);
}

#[test]
fn removal_drops_amount_from_every_sum() {
    let (mut manager, _) = memory_manager();
    let keep = manager
        .add_transaction(
            MonthKey::July,
            confirmed("Salary", 1000.0, TransactionKind::Income, MonthKey::July),
        )
        .unwrap()
        .into_value();
    let gone = manager
        .add_transaction(
            MonthKey::July,
            pending("Trip", 700.0, TransactionKind::Expense, MonthKey::July),
        )
        .unwrap()
        .into_value();

    let removed = manager.remove_transaction(MonthKey::July, &gone).unwrap().into_value();
    assert_eq!(removed.description, "Trip");
    let summary = manager.month_summary(MonthKey::July);
    assert_eq!(summary.projected(), 1000.0);
    assert_eq!(summary.transaction_count, 1);
    assert_eq!(manager.transactions(MonthKey::July)[0].id, keep);
    assert!(manager.top_expense_categories(5).is_empty());
}

#[test]
fn unknown_ids_surface_as_not_found() {
    let (mut manager, _) = memory_manager();
    let id = manager
        .add_transaction(
            MonthKey::July,
            confirmed("Salary", 1000.0, TransactionKind::Income, MonthKey::July),
        )
        .unwrap()
        .into_value();
    // Ids are scoped to their month.
    let err = manager.remove_transaction(MonthKey::August, &id).unwrap_err();
    assert!(matches!(err, ServiceError::TransactionNotFound(ref missing) if *missing == id));
    assert_eq!(manager.state().transaction_count(), 1);
}

#[test]
fn update_replaces_fields_and_keeps_position() {
    let (mut manager, _) = memory_manager();
    let first = manager
        .add_transaction(
            MonthKey::March,
            confirmed("Coffee", 5.0, TransactionKind::Expense, MonthKey::March),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::March,
            confirmed("Lunch", 20.0, TransactionKind::Expense, MonthKey::March),
        )
        .unwrap()
        .into_value();

    let mut edited = manager.transactions(MonthKey::March)[1].clone();
    assert_eq!(edited.id, first);
    edited.amount = 7.5;
    edited.status = TransactionStatus::Pending;
    let previous = manager.update_transaction(MonthKey::March, edited).unwrap().into_value();
    assert_eq!(previous.amount, 5.0);

    let stored = &manager.transactions(MonthKey::March)[1];
    assert_eq!(stored.amount, 7.5);
    assert_eq!(manager.month_summary(MonthKey::March).confirmed_expense(), 20.0);
}

#[test]
fn newest_transactions_come_first() {
    let (mut manager, _) = memory_manager();
    for description in ["first", "second", "third"] {
        manager
            .add_transaction(
                MonthKey::March,
                confirmed(description, 1.0, TransactionKind::Expense, MonthKey::March),
            )
            .unwrap()
            .into_value();
    }
    let order: Vec<&str> = manager
        .transactions(MonthKey::March)
        .iter()
        .map(|txn| txn.description.as_str())
        .collect();
    assert_eq!(order, ["third", "second", "first"]);
}

#[test]
fn filter_matches_description_or_category_and_type() {
    let (mut manager, _) = memory_manager();
    let date = common::date_in(MonthKey::September, 3);
    manager
        .add_transaction(
            MonthKey::September,
            TransactionDraft::new("Supermarket", 230.0, TransactionKind::Expense, "Food", date),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::September,
            TransactionDraft::new("Food truck sale", 90.0, TransactionKind::Income, "Other", date),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::September,
            TransactionDraft::new("Bus pass", 60.0, TransactionKind::Expense, "Transport", date),
        )
        .unwrap()
        .into_value();

    let by_text = manager.filter_transactions(
        MonthKey::September,
        &TransactionFilter::new("FOOD", TypeFilter::All),
    );
    assert_eq!(by_text.len(), 2);

    let expenses = manager.filter_transactions(
        MonthKey::September,
        &TransactionFilter::new("food", TypeFilter::Expense),
    );
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, "Supermarket");

    let everything =
        manager.filter_transactions(MonthKey::September, &TransactionFilter::default());
    assert_eq!(everything.len(), 3);
    assert!(manager
        .filter_transactions(MonthKey::October, &TransactionFilter::default())
        .is_empty());
}

#[test]
fn overview_counts_every_status() {
    let (mut manager, _) = memory_manager();
    manager
        .add_transaction(
            MonthKey::January,
            confirmed("Salary", 1000.0, TransactionKind::Income, MonthKey::January),
        )
        .unwrap()
        .into_value();
    manager
        .add_transaction(
            MonthKey::January,
            pending("Dentist", 150.0, TransactionKind::Expense, MonthKey::January),
        )
        .unwrap()
        .into_value();

    let flow = manager.monthly_flow();
    assert_eq!(flow.len(), 12);
    assert_eq!(flow[0].month, MonthKey::January);
    assert_eq!(flow[0].income, 1000.0);
    assert_eq!(flow[0].expense, 150.0);
    assert!(flow[1..].iter().all(|entry| entry.income == 0.0 && entry.expense == 0.0));

    let top = manager.top_expense_categories(5);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Other");
    assert_eq!(top[0].total, 150.0);
}

#[test]
fn toggling_carry_over_only_touches_the_selected_month() {
    let (mut manager, _) = memory_manager();
    assert!(manager.toggle_carry_over(MonthKey::August).unwrap().into_value());
    assert!(manager.carries_over(MonthKey::August));
    assert!(!manager.carries_over(MonthKey::September));
    assert!(!manager.toggle_carry_over(MonthKey::August).unwrap().into_value());
}
