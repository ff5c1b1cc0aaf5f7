// src/lib.rs

//! Recipebox
//!
//! Recipe management service: paginated CRUD over recipes, each with an
//! optional image hosted by an external media service.
//!
//! # Architecture
//!
//! - Service-first: [`recipe::RecipeService`] owns validation and the order
//!   of side effects; transports only translate
//! - Pluggable stores: [`store::RecipeStore`] (SQLite or in-memory)
//! - Pluggable media hosts: [`media::MediaHost`] (Cloudinary or S3)
//! - HTTP API behind the `server` feature

pub mod db;
mod error;
pub mod media;
pub mod recipe;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

pub use error::{Error, Result};
pub use media::{ImageUpload, MediaError, MediaHost};
pub use recipe::{
    Page, PageRequest, Recipe, RecipeError, RecipeFields, RecipeId, RecipeService,
    ValidationErrors,
};
pub use store::{RecipeStore, open_store};
