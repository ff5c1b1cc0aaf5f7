// src/store/sqlite.rs

//! SQLite-backed recipe store
//!
//! rusqlite is blocking, so every operation opens its own connection on the
//! blocking pool.

use super::RecipeStore;
use crate::db::{self, models::RecipeEntry};
use crate::error::Result;
use crate::recipe::{NewRecipe, Recipe, RecipeId, RecipePatch};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SqliteRecipeStore {
    db_path: PathBuf,
}

impl SqliteRecipeStore {
    /// Open (creating and migrating if needed) the database at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        db::init(&db_path)?;
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db::open(&db_path)?;
            f(&mut conn)
        })
        .await?
    }
}

#[async_trait]
impl RecipeStore for SqliteRecipeStore {
    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe> {
        self.with_conn(move |conn| {
            let mut entry = RecipeEntry::new(recipe);
            let seq = entry.insert(conn)?;
            debug!("Inserted recipe {} at seq {}", entry.id, seq);
            Ok(entry.into_recipe())
        })
        .await
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>> {
        self.with_conn(move |conn| {
            Ok(RecipeEntry::find_by_id(conn, &id)?.map(RecipeEntry::into_recipe))
        })
        .await
    }

    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Recipe>> {
        self.with_conn(move |conn| {
            let entries = RecipeEntry::list_page(conn, skip, limit)?;
            Ok(entries.into_iter().map(RecipeEntry::into_recipe).collect())
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.with_conn(|conn| RecipeEntry::count(conn)).await
    }

    async fn update_by_id(&self, id: RecipeId, patch: RecipePatch) -> Result<Option<Recipe>> {
        self.with_conn(move |conn| {
            db::transaction(conn, |tx| {
                if !RecipeEntry::apply_patch(tx, &id, &patch)? {
                    return Ok(None);
                }
                Ok(RecipeEntry::find_by_id(tx, &id)?.map(RecipeEntry::into_recipe))
            })
        })
        .await
    }

    async fn delete_by_id(&self, id: RecipeId) -> Result<bool> {
        self.with_conn(move |conn| RecipeEntry::delete(conn, &id)).await
    }
}
