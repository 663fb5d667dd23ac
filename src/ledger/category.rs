use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Labels every fresh state starts with.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Salary",
    "Housing",
    "Food",
    "Transport",
    "Health",
    "Leisure",
    "Education",
    "Other",
];

/// Tag attached to transactions by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// Ordered category list with case-insensitive name lookup.
///
/// Transactions store the category name itself, so nothing here cascades to
/// existing transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn seeded() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().copied().map(Category::new).collect(),
        }
    }

    pub fn find(&self, name: &str) -> Option<&Category> {
        let needle = name.trim();
        self.categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(needle))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Appends `name` unless an entry with the same name exists; returns the entry either way.
    pub fn add(&mut self, name: impl Into<String>) -> &Category {
        let name = name.into();
        let name = name.trim();
        let position = match self
            .categories
            .iter()
            .position(|category| category.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing,
            None => {
                self.categories.push(Category::new(name));
                self.categories.len() - 1
            }
        };
        &self.categories[position]
    }

    /// First category, used as the default selection for new transactions.
    pub fn first(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
