// src/recipe/error.rs

//! Error taxonomy for recipe operations

use super::validate::ValidationErrors;
use super::{InvalidRecipeId, RecipeId};
use crate::media::MediaError;
use thiserror::Error;

/// Failures surfaced by [`super::RecipeService`]
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Missing or malformed fields; user-correctable
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The id is not a syntactically valid recipe id
    #[error("Please use a valid recipe id")]
    InvalidIdentifier(String),

    /// Valid id, no matching record
    #[error("Recipe not found")]
    NotFound(RecipeId),

    /// The media host failed; nothing was written
    #[error("Image upload failed: {0}")]
    Upload(#[from] MediaError),

    /// Unexpected persistence failure
    #[error("Store error: {0}")]
    Store(#[from] crate::Error),
}

impl From<ValidationErrors> for RecipeError {
    fn from(errors: ValidationErrors) -> Self {
        RecipeError::Validation(errors)
    }
}

impl From<InvalidRecipeId> for RecipeError {
    fn from(err: InvalidRecipeId) -> Self {
        RecipeError::InvalidIdentifier(err.0)
    }
}

impl RecipeError {
    /// Short machine-readable kind for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            RecipeError::Validation(_) => "validation",
            RecipeError::InvalidIdentifier(_) => "invalid_identifier",
            RecipeError::NotFound(_) => "not_found",
            RecipeError::Upload(_) => "upload",
            RecipeError::Store(_) => "store",
        }
    }
}
