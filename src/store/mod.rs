// src/store/mod.rs

//! Recipe persistence behind an async trait
//!
//! The service only talks to [`RecipeStore`]. Two implementations ship:
//! - [`SqliteRecipeStore`] - file-backed, the production store
//! - [`MemoryRecipeStore`] - in-process, for tests and `memory://`

mod memory;
mod sqlite;

pub use memory::MemoryRecipeStore;
pub use sqlite::SqliteRecipeStore;

use crate::error::{Error, Result};
use crate::recipe::{NewRecipe, Recipe, RecipeId, RecipePatch};
use async_trait::async_trait;
use std::sync::Arc;

/// Async CRUD over recipes, in store-native (insertion) order
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Persist a new recipe and return it with its assigned id
    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe>;

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>>;

    /// Up to `limit` recipes after skipping `skip`
    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Recipe>>;

    /// Total number of recipes
    async fn count(&self) -> Result<u64>;

    /// Merge `patch` into the stored recipe atomically; `None` if it is gone
    async fn update_by_id(&self, id: RecipeId, patch: RecipePatch) -> Result<Option<Recipe>>;

    /// Remove the recipe; false if it did not exist
    async fn delete_by_id(&self, id: RecipeId) -> Result<bool>;
}

/// Open a store from a connection string
///
/// - `memory://` - a fresh in-memory store
/// - `sqlite://<path>` or a bare path - a SQLite file, migrated on open
pub fn open_store(url: &str) -> Result<Arc<dyn RecipeStore>> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::ConfigError("Database URL is empty".to_string()));
    }

    if url == "memory://" || url == "memory" {
        return Ok(Arc::new(MemoryRecipeStore::new()));
    }

    let path = url.strip_prefix("sqlite://").unwrap_or(url);
    if path.is_empty() {
        return Err(Error::ConfigError(format!("Missing database path in '{}'", url)));
    }
    if path.contains("://") {
        return Err(Error::ConfigError(format!("Unsupported database URL: {}", url)));
    }

    Ok(Arc::new(SqliteRecipeStore::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store("memory://").unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_open_sqlite_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("recipes.db");

        let store = open_store(&format!("sqlite://{}", path.display())).unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(path.exists());

        let bare = open_store(path.to_str().unwrap()).unwrap();
        assert_eq!(bare.count().await.unwrap(), 0);
    }

    #[test]
    fn test_open_rejects_unknown_scheme() {
        assert!(open_store("mongodb://localhost/recipes").is_err());
        assert!(open_store("").is_err());
        assert!(open_store("sqlite://").is_err());
    }
}
