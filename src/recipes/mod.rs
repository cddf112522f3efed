//! Recipe corpus, dish suggestions, and fuzzy name matching

mod catalog;
mod matcher;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

pub use catalog::{DishCatalog, SuggestionCatalog};
pub use matcher::{RecipeMatcher, TokenSortMatcher};

/// One recipe: what you need and what to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Ingredient list, spoken in order
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Instruction steps, spoken with 1-based numbering
    #[serde(default)]
    pub instructions: Vec<String>,
}

/// In-memory recipe corpus keyed by dish name
pub struct RecipeStore {
    recipes: HashMap<String, Recipe>,
}

impl RecipeStore {
    /// Load the corpus from a JSON file (name → recipe)
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let recipes: HashMap<String, Recipe> = serde_json::from_str(&content)?;

        tracing::info!(path = %path.display(), count = recipes.len(), "loaded recipe corpus");

        Ok(Self { recipes })
    }

    /// Build a corpus from an in-memory map
    #[must_use]
    pub const fn from_map(recipes: HashMap<String, Recipe>) -> Self {
        Self { recipes }
    }

    /// All dish names in the corpus
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.recipes.keys().cloned().collect()
    }

    /// Look up a recipe by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    /// Number of recipes in the corpus
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the corpus is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
