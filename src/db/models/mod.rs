// src/db/models/mod.rs

//! Data models for recipe database entities
//!
//! Each struct mirrors one table and carries the SQL for reading and
//! writing it.

mod recipe;

pub use recipe::RecipeEntry;
