// src/store/memory.rs

//! In-process recipe store

use super::RecipeStore;
use crate::error::Result;
use crate::recipe::{NewRecipe, Recipe, RecipeId, RecipePatch};
use async_trait::async_trait;
use parking_lot::RwLock;

/// Insertion-ordered recipes held in memory
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<Vec<Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe> {
        let recipe = Recipe {
            id: RecipeId::generate(),
            title: recipe.title,
            instructions: recipe.instructions,
            ingredients: recipe.ingredients,
            image_url: recipe.image_url,
        };
        self.recipes.write().push(recipe.clone());
        Ok(recipe)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>> {
        Ok(self.recipes.read().iter().find(|r| r.id == id).cloned())
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Recipe>> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .recipes
            .read()
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.recipes.read().len() as u64)
    }

    async fn update_by_id(&self, id: RecipeId, patch: RecipePatch) -> Result<Option<Recipe>> {
        let mut recipes = self.recipes.write();
        Ok(recipes.iter_mut().find(|r| r.id == id).map(|recipe| {
            patch.apply_to(recipe);
            recipe.clone()
        }))
    }

    async fn delete_by_id(&self, id: RecipeId) -> Result<bool> {
        let mut recipes = self.recipes.write();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok(recipes.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_recipe(title: &str) -> NewRecipe {
        NewRecipe {
            title: title.to_string(),
            instructions: "Chop".to_string(),
            ingredients: vec!["onion".to_string()],
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_page_window() {
        let store = MemoryRecipeStore::new();
        for i in 0..4 {
            store.insert(new_recipe(&format!("r{i}"))).await.unwrap();
        }

        let page = store.find_page(2, 10).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "r2");
        assert!(store.find_page(9, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_update_is_none() {
        let store = MemoryRecipeStore::new();
        let recipe = store.insert(new_recipe("Curry")).await.unwrap();

        assert!(store.delete_by_id(recipe.id).await.unwrap());
        assert!(!store.delete_by_id(recipe.id).await.unwrap());

        let patch = RecipePatch {
            title: Some("Korma".to_string()),
            ..Default::default()
        };
        assert!(store.update_by_id(recipe.id, patch).await.unwrap().is_none());
    }
}
