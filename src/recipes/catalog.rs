//! Dish suggestions per detected food class

use std::collections::HashMap;
use std::path::Path;

use crate::Result;

/// Maps a detected class label to dish suggestions
pub trait SuggestionCatalog: Send + Sync {
    /// Suggestions for a class label, most relevant first; empty if unknown
    fn suggestions_for(&self, class: &str) -> Vec<String>;
}

/// Catalog backed by a JSON file (class → dish names)
pub struct DishCatalog {
    dishes: HashMap<String, Vec<String>>,
    cap: usize,
}

impl DishCatalog {
    /// Load the catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path, cap: usize) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dishes: HashMap<String, Vec<String>> = serde_json::from_str(&content)?;

        tracing::info!(path = %path.display(), classes = dishes.len(), "loaded dish catalog");

        Ok(Self { dishes, cap })
    }

    /// Build a catalog from an in-memory map
    #[must_use]
    pub const fn from_map(dishes: HashMap<String, Vec<String>>, cap: usize) -> Self {
        Self { dishes, cap }
    }
}

impl SuggestionCatalog for DishCatalog {
    fn suggestions_for(&self, class: &str) -> Vec<String> {
        self.dishes
            .get(&class.to_lowercase())
            .map(|dishes| dishes.iter().take(self.cap).cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(cap: usize) -> DishCatalog {
        let mut map = HashMap::new();
        map.insert(
            "tomato".to_string(),
            (1..=12).map(|i| format!("Dish {i}")).collect(),
        );
        DishCatalog::from_map(map, cap)
    }

    #[test]
    fn test_suggestions_capped() {
        let suggestions = catalog(9).suggestions_for("tomato");
        assert_eq!(suggestions.len(), 9);
        assert_eq!(suggestions[0], "Dish 1");
        assert_eq!(suggestions[8], "Dish 9");
    }

    #[test]
    fn test_class_lookup_case_insensitive() {
        assert_eq!(catalog(9).suggestions_for("Tomato").len(), 9);
    }

    #[test]
    fn test_unknown_class_is_empty() {
        assert!(catalog(9).suggestions_for("durian").is_empty());
    }
}
