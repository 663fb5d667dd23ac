use chrono::NaiveDate;
use finance_core::{
    advisor::{advise, OfflineAdvisor},
    config::Config,
    core::FinanceManager,
    init,
    ledger::{MonthKey, TransactionDraft, TransactionKind},
    storage::MemoryStore,
};

#[test]
fn manager_advisor_smoke() {
    init();

    let (mut manager, _) = FinanceManager::open(Box::new(MemoryStore::new())).unwrap();
    manager
        .add_transaction(
            MonthKey::October,
            TransactionDraft::new(
                "Consulting",
                2500.0,
                TransactionKind::Income,
                "",
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            ),
        )
        .unwrap()
        .into_value();

    let stored = &manager.transactions(MonthKey::October)[0];
    assert_eq!(stored.category, "Salary");

    let text = advise(
        &OfflineAdvisor::new(Config::default()),
        MonthKey::October,
        manager.transactions(MonthKey::October),
    );
    assert!(text.contains("R$ 2.500,00"));
}
