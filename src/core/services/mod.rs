pub mod category_service;
pub mod month_service;
pub mod summary_service;
pub mod transaction_service;

pub use category_service::CategoryService;
pub use month_service::MonthService;
pub use summary_service::{
    CategoryTotal, MonthSummary, MonthlyFlow, SummaryService, TransactionFilter, TypeFilter,
};
pub use transaction_service::TransactionService;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}
