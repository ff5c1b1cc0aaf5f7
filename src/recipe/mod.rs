// src/recipe/mod.rs

//! Recipe domain: entity, write payloads, validation, pagination and the
//! CRUD service that ties the store and media host together.
//!
//! # Flow
//!
//! ```text
//! RecipeFields ──validate──► NewRecipe / RecipePatch ──► RecipeStore
//!                                 ▲
//!        ImageUpload ──MediaHost──┘ (imageUrl)
//! ```

mod error;
mod page;
mod service;
mod validate;

pub use error::RecipeError;
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest};
pub use service::RecipeService;
pub use validate::{ValidationErrors, ValidationMode};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque recipe identifier, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Text that is not a syntactically valid recipe id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid recipe id: '{0}'")]
pub struct InvalidRecipeId(pub String);

impl FromStr for RecipeId {
    type Err = InvalidRecipeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s.trim())
            .map(Self)
            .map_err(|_| InvalidRecipeId(s.to_string()))
    }
}

/// A stored recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    pub title: String,
    pub instructions: String,
    pub ingredients: Vec<String>,
    /// Hosted image URL; null until an upload succeeds
    pub image_url: Option<String>,
}

/// Raw write payload as received from a client
///
/// Every field is optional so that a missing field surfaces as a
/// validation message instead of a decode error. Unknown keys (including a
/// client-supplied `imageUrl`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecipeFields {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

impl RecipeFields {
    pub fn new(title: &str, instructions: &str, ingredients: &[&str]) -> Self {
        Self {
            title: Some(title.to_string()),
            instructions: Some(instructions.to_string()),
            ingredients: Some(ingredients.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.instructions.is_none() && self.ingredients.is_none()
    }
}

/// A validated recipe ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    pub ingredients: Vec<String>,
    pub image_url: Option<String>,
}

/// A validated partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.instructions.is_none()
            && self.ingredients.is_none()
            && self.image_url.is_none()
    }

    /// Apply this patch to an in-memory recipe
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title = title.clone();
        }
        if let Some(instructions) = &self.instructions {
            recipe.instructions = instructions.clone();
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients = ingredients.clone();
        }
        if let Some(image_url) = &self.image_url {
            recipe.image_url = Some(image_url.clone());
        }
    }
}
