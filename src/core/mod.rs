pub mod finance_manager;
pub mod services;

pub use finance_manager::{Committed, FinanceManager};
