// src/server/handlers/recipes.rs
//! Recipe CRUD handlers

use crate::recipe::{Page, PageRequest, Recipe};
use crate::server::SharedState;
use crate::server::form::RecipeForm;
use crate::server::response::{ApiError, ApiResponse, ApiResult};
use axum::extract::{Path, Query, State, rejection::QueryRejection};
use serde::Deserialize;
use tracing::info;

/// Query parameters for the list endpoint
///
/// Kept as text so out-of-range numbers clamp instead of failing to decode.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// List recipes, one page at a time
///
/// GET /api/recipes?page=&limit=
pub async fn list_recipes(
    State(state): State<SharedState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<Recipe>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = PageRequest::from_query(params.page.as_deref(), params.limit.as_deref());

    let page = state.service.list(request).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /api/recipes/:id
pub async fn get_recipe(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Recipe> {
    let recipe = state.service.get_by_id(&id).await?;
    Ok(ApiResponse::ok(recipe))
}

/// Create a recipe, uploading its image first if one was sent
///
/// POST /api/recipes
pub async fn create_recipe(
    State(state): State<SharedState>,
    form: RecipeForm,
) -> ApiResult<Recipe> {
    let image_bytes = form.image.as_ref().map(|image| image.len() as u64);

    let recipe = state.service.create(form.fields, form.image).await?;
    state.metrics.record_created();
    if let Some(bytes) = image_bytes {
        state.metrics.record_image(bytes);
    }
    info!("POST /api/recipes -> {}", recipe.id);

    Ok(ApiResponse::created(recipe, "Recipe created"))
}

/// Update the fields present in the body; replace the image if one was sent
///
/// PUT /api/recipes/:id
pub async fn update_recipe(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    form: RecipeForm,
) -> ApiResult<Recipe> {
    let image_bytes = form.image.as_ref().map(|image| image.len() as u64);

    let recipe = state.service.update(&id, form.fields, form.image).await?;
    state.metrics.record_updated();
    if let Some(bytes) = image_bytes {
        state.metrics.record_image(bytes);
    }

    Ok(ApiResponse::ok(recipe))
}

/// DELETE /api/recipes/:id
pub async fn delete_recipe(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.service.delete(&id).await?;
    state.metrics.record_deleted();

    Ok(ApiResponse::ok(()).with_message("Recipe deleted"))
}
