//! Ledger domain models: the month calendar, transactions, categories and
//! the finance state that ties them together.

pub mod category;
pub mod month;
pub mod month_ledger;
pub mod state;
pub mod transaction;

pub use category::{Category, CategoryRegistry, DEFAULT_CATEGORIES};
pub use month::{MonthKey, ParseMonthError};
pub use month_ledger::{MonthLedger, MonthSettings, MonthTotals};
pub use state::{FinanceState, CURRENT_SCHEMA_VERSION};
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};
