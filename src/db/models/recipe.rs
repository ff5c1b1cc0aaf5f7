// src/db/models/recipe.rs

//! Recipe row model

use crate::error::Result;
use crate::recipe::{NewRecipe, Recipe, RecipeId, RecipePatch};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str =
    "seq, id, title, instructions, ingredients, image_url, created_at, updated_at";

/// A row of the `recipes` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeEntry {
    pub seq: Option<i64>,
    pub id: RecipeId,
    pub title: String,
    pub instructions: String,
    pub ingredients: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl RecipeEntry {
    /// Build an unsaved entry with a fresh id
    pub fn new(recipe: NewRecipe) -> Self {
        Self {
            seq: None,
            id: RecipeId::generate(),
            title: recipe.title,
            instructions: recipe.instructions,
            ingredients: recipe.ingredients,
            image_url: recipe.image_url,
            created_at: None,
            updated_at: None,
        }
    }

    /// Insert this entry, returning its sequence number
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        let ingredients = serde_json::to_string(&self.ingredients)?;
        conn.execute(
            "INSERT INTO recipes (id, title, instructions, ingredients, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.id.to_string(),
                &self.title,
                &self.instructions,
                ingredients,
                &self.image_url,
            ],
        )?;

        let seq = conn.last_insert_rowid();
        self.seq = Some(seq);
        Ok(seq)
    }

    pub fn find_by_id(conn: &Connection, id: &RecipeId) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM recipes WHERE id = ?1"))?;
        let entry = stmt
            .query_row([id.to_string()], Self::from_row)
            .optional()?;
        Ok(entry)
    }

    /// One window of recipes in insertion order
    pub fn list_page(conn: &Connection, skip: u64, limit: u64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM recipes ORDER BY seq LIMIT ?1 OFFSET ?2"
        ))?;

        let entries = stmt
            .query_map(params![clamp_i64(limit), clamp_i64(skip)], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn count(conn: &Connection) -> Result<u64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Apply a partial update in one statement; false if no row matched
    pub fn apply_patch(conn: &Connection, id: &RecipeId, patch: &RecipePatch) -> Result<bool> {
        let ingredients = patch
            .ingredients
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let changed = conn.execute(
            "UPDATE recipes SET
                title = COALESCE(?2, title),
                instructions = COALESCE(?3, instructions),
                ingredients = COALESCE(?4, ingredients),
                image_url = COALESCE(?5, image_url),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?1",
            params![
                id.to_string(),
                &patch.title,
                &patch.instructions,
                ingredients,
                &patch.image_url,
            ],
        )?;

        Ok(changed > 0)
    }

    /// Delete by id; false if no row matched
    pub fn delete(conn: &Connection, id: &RecipeId) -> Result<bool> {
        let deleted = conn.execute("DELETE FROM recipes WHERE id = ?1", [id.to_string()])?;
        Ok(deleted > 0)
    }

    pub fn into_recipe(self) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title,
            instructions: self.instructions,
            ingredients: self.ingredients,
            image_url: self.image_url,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id_str: String = row.get(1)?;
        let id = id_str.parse::<RecipeId>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let ingredients_json: String = row.get(4)?;
        let ingredients: Vec<String> = serde_json::from_str(&ingredients_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            seq: Some(row.get(0)?),
            id,
            title: row.get(2)?,
            instructions: row.get(3)?,
            ingredients,
            image_url: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
