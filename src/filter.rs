// src/filter.rs
use crate::catalog::ALL_CATEGORIES;
use crate::podcast::PodcastEntry;

/// What the user has typed into the search field and picked from the
/// category chips. UI-local, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: String,
    pub query: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self { category: ALL_CATEGORIES.to_string(), query: String::new() }
    }
}

impl FilterCriteria {
    pub fn new(category: impl Into<String>, query: impl Into<String>) -> Self {
        Self { category: category.into(), query: query.into() }
    }

    fn matches(&self, entry: &PodcastEntry) -> bool {
        (self.category == ALL_CATEGORIES || entry.category() == self.category)
            && entry.title().to_lowercase().contains(&self.query.to_lowercase())
    }
}

/// Pure filter over the catalog. Preserves input order, never fails;
/// an empty result is a valid result.
pub fn apply(entries: &[PodcastEntry], criteria: &FilterCriteria) -> Vec<PodcastEntry> {
    entries.iter().filter(|e| criteria.matches(e)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_default_criteria_return_full_catalog() {
        let catalog = Catalog::builtin();
        let result = apply(catalog.list(), &FilterCriteria::default());
        assert_eq!(result, catalog.list());
    }

    #[test]
    fn test_category_filter() {
        let catalog = Catalog::builtin();
        let result = apply(catalog.list(), &FilterCriteria::new("Science", ""));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title(), "Science Vs");
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let catalog = Catalog::builtin();
        let result = apply(catalog.list(), &FilterCriteria::new(ALL_CATEGORIES, "MONEY"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title(), "Planet Money");
    }

    #[test]
    fn test_category_and_query_combine() {
        let catalog = Catalog::builtin();
        // Query matches Planet Money, but the category excludes it.
        let result = apply(catalog.list(), &FilterCriteria::new("Science", "money"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_output_preserves_catalog_order() {
        let catalog = Catalog::builtin();
        let result = apply(catalog.list(), &FilterCriteria::new(ALL_CATEGORIES, "s"));
        let positions: Vec<usize> = result
            .iter()
            .map(|e| catalog.list().iter().position(|c| c == e).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let catalog = Catalog::builtin();
        let criteria = FilterCriteria::new(ALL_CATEGORIES, "in");
        let once = apply(catalog.list(), &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once, twice);
    }
}
