// src/server/form.rs
//! Recipe write-body extractor
//!
//! Create and update accept either `multipart/form-data` (text fields plus
//! an optional `image` file) or `application/json` (text fields only).
//! Multipart image rules:
//! - at most one file, in the `image` field
//! - MIME type must start with `image/`
//! - no larger than the configured cap (413 otherwise)

use crate::media::{ImageUpload, is_image_content_type};
use crate::recipe::RecipeFields;
use crate::server::SharedState;
use crate::server::response::ApiError;
use async_trait::async_trait;
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, multipart::Field},
    http::{StatusCode, header::CONTENT_TYPE},
};
use tracing::{debug, warn};

/// Parsed recipe write body
#[derive(Debug, Default)]
pub struct RecipeForm {
    pub fields: RecipeFields,
    pub image: Option<ImageUpload>,
}

#[async_trait]
impl FromRequest<SharedState> for RecipeForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &SharedState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());

        match content_type.as_deref() {
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                read_multipart(multipart, state.max_image_bytes).await
            }
            Some(ct) if ct.starts_with("application/json") => {
                let Json(fields) = Json::<RecipeFields>::from_request(req, state)
                    .await
                    .map_err(|e| {
                        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                            ApiError::PayloadTooLarge("Request body too large".to_string())
                        } else {
                            ApiError::BadRequest(e.body_text())
                        }
                    })?;
                Ok(Self {
                    fields,
                    image: None,
                })
            }
            // No body at all: every field is absent
            None => Ok(Self::default()),
            Some(other) => Err(ApiError::BadRequest(format!(
                "Unsupported content type: {}",
                other
            ))),
        }
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("File too large".to_string())
    } else {
        warn!("Multipart read error: {}", err);
        ApiError::BadRequest(format!("Failed to read multipart data: {}", err.body_text()))
    }
}

fn too_large(max_bytes: usize) -> ApiError {
    ApiError::PayloadTooLarge(format!(
        "File too large. Maximum size is {} bytes",
        max_bytes
    ))
}

/// Read a file field chunk by chunk, failing as soon as it passes the cap
async fn read_capped(mut field: Field<'_>, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_multipart(mut multipart: Multipart, max_image_bytes: usize) -> Result<RecipeForm, ApiError> {
    let mut form = RecipeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => form.fields.title = Some(field.text().await.map_err(multipart_error)?),
            "instructions" => {
                form.fields.instructions = Some(field.text().await.map_err(multipart_error)?)
            }
            "ingredients" | "ingredients[]" => {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields
                    .ingredients
                    .get_or_insert_with(Vec::new)
                    .push(value);
            }
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = read_capped(field, max_image_bytes).await?;

                // Browsers send an empty part when no file was chosen; a
                // zero-byte file has nothing to host either
                if bytes.is_empty() {
                    debug!("Skipping empty image part {:?}", file_name);
                    continue;
                }
                if form.image.is_some() {
                    return Err(ApiError::BadRequest(
                        "Only one image may be uploaded".to_string(),
                    ));
                }
                if !is_image_content_type(&content_type) {
                    return Err(ApiError::BadRequest("Only image files are allowed".to_string()));
                }

                let mut image = ImageUpload::new(bytes, content_type);
                if let Some(file_name) = file_name {
                    image = image.with_file_name(file_name);
                }
                form.image = Some(image);
            }
            other => {
                debug!("Ignoring unknown form field '{}'", other);
            }
        }
    }

    Ok(form)
}
