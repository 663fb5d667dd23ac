use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{Category, FinanceState};

pub struct CategoryService;

impl CategoryService {
    /// Registers `name`, returning the existing entry when the name is already known.
    pub fn add(state: &mut FinanceState, name: &str) -> ServiceResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("category name must not be empty".into()));
        }
        Ok(state.categories.add(name).clone())
    }

    pub fn find<'a>(state: &'a FinanceState, name: &str) -> ServiceResult<&'a Category> {
        state
            .categories
            .find(name)
            .ok_or_else(|| ServiceError::CategoryNotFound(name.to_string()))
    }

    pub fn list(state: &FinanceState) -> Vec<&Category> {
        state.categories.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_blank_names() {
        let mut state = FinanceState::new();
        assert!(matches!(
            CategoryService::add(&mut state, "  "),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn added_category_is_findable() {
        let mut state = FinanceState::new();
        let created = CategoryService::add(&mut state, "Subscriptions").unwrap();
        let found = CategoryService::find(&state, "subscriptions").unwrap();
        assert_eq!(found.id, created.id);
        assert!(matches!(
            CategoryService::find(&state, "Yachts"),
            Err(ServiceError::CategoryNotFound(_))
        ));
    }
}
