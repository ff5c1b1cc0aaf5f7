// src/recipe/service.rs

//! Recipe CRUD orchestration
//!
//! The service owns the order of side effects: input is validated before
//! anything is uploaded, and nothing is written unless the upload (if any)
//! succeeded. Each operation makes at most one upload call and does not
//! retry.

use super::validate::{self, check_image};
use super::{Page, PageRequest, Recipe, RecipeError, RecipeFields, RecipeId};
use crate::media::{ImageUpload, MediaError, MediaHost};
use crate::store::RecipeStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

type Result<T> = std::result::Result<T, RecipeError>;

/// CRUD over recipes, with optional image hosting
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    media: Option<Arc<dyn MediaHost>>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>, media: Option<Arc<dyn MediaHost>>) -> Self {
        Self { store, media }
    }

    /// One page of recipes in store order, with paging metadata
    pub async fn list(&self, request: PageRequest) -> Result<Page<Recipe>> {
        let (results, total) = tokio::try_join!(
            self.store.find_page(request.skip(), request.limit()),
            self.store.count(),
        )?;

        debug!(
            "Listed page {} ({} of {} recipes)",
            request.page(),
            results.len(),
            total
        );
        Ok(Page::new(results, total, request))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Recipe> {
        let id: RecipeId = id.parse()?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(RecipeError::NotFound(id))
    }

    /// Validate, upload the image if present, then insert
    pub async fn create(&self, fields: RecipeFields, image: Option<ImageUpload>) -> Result<Recipe> {
        let mut recipe = check_image(validate::validate_new(fields), image.as_ref())?;

        if let Some(image) = &image {
            recipe.image_url = Some(self.upload(image).await?);
        }

        let recipe = self.store.insert(recipe).await?;
        info!("Created recipe {} ({})", recipe.id, recipe.title);
        Ok(recipe)
    }

    /// Apply the fields present in `fields`, replacing the image if one is given
    ///
    /// A record that vanishes between the existence check and the write is
    /// reported as not found.
    pub async fn update(
        &self,
        id: &str,
        fields: RecipeFields,
        image: Option<ImageUpload>,
    ) -> Result<Recipe> {
        let id: RecipeId = id.parse()?;
        let mut patch = check_image(validate::validate_patch(fields), image.as_ref())?;

        if self.store.find_by_id(id).await?.is_none() {
            return Err(RecipeError::NotFound(id));
        }

        if let Some(image) = &image {
            patch.image_url = Some(self.upload(image).await?);
        }

        let recipe = self
            .store
            .update_by_id(id, patch)
            .await?
            .ok_or(RecipeError::NotFound(id))?;
        info!("Updated recipe {}", recipe.id);
        Ok(recipe)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id: RecipeId = id.parse()?;
        if !self.store.delete_by_id(id).await? {
            return Err(RecipeError::NotFound(id));
        }
        info!("Deleted recipe {}", id);
        Ok(())
    }

    async fn upload(&self, image: &ImageUpload) -> Result<String> {
        let host = self.media.as_ref().ok_or(MediaError::NotConfigured)?;

        debug!(
            "Uploading image ({} bytes, {}) via {}",
            image.len(),
            image.content_type,
            host.name()
        );
        match host.upload(image).await {
            Ok(url) => Ok(url),
            Err(e) => {
                warn!("Image upload via {} failed: {}", host.name(), e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecipeStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHost {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl MediaHost for CountingHost {
        fn name(&self) -> &str {
            "counting"
        }

        async fn upload(&self, _image: &ImageUpload) -> std::result::Result<String, MediaError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(MediaError::Rejected {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok(format!("https://img.example/{n}.png"))
            }
        }
    }

    fn service(fail: bool) -> (RecipeService, Arc<CountingHost>, Arc<MemoryRecipeStore>) {
        let host = Arc::new(CountingHost {
            calls: AtomicUsize::new(0),
            fail,
        });
        let store = Arc::new(MemoryRecipeStore::new());
        let media: Arc<dyn MediaHost> = host.clone();
        let svc = RecipeService::new(store.clone(), Some(media));
        (svc, host, store)
    }

    fn png() -> ImageUpload {
        ImageUpload::new(vec![0x89, b'P', b'N', b'G'], "image/png")
    }

    fn fields() -> RecipeFields {
        RecipeFields::new("Pancakes", "Mix and fry", &["flour", "milk", "eggs"])
    }

    #[tokio::test]
    async fn test_create_with_image_sets_url() {
        let (svc, host, _) = service(false);
        let recipe = svc.create(fields(), Some(png())).await.unwrap();
        assert_eq!(recipe.image_url.as_deref(), Some("https://img.example/0.png"));
        assert_eq!(host.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_create_never_uploads() {
        let (svc, host, store) = service(false);
        let err = svc.create(RecipeFields::default(), Some(png())).await.unwrap_err();
        assert!(matches!(err, RecipeError::Validation(_)));
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_upload_writes_nothing() {
        let (svc, _, store) = service(true);
        let err = svc.create(fields(), Some(png())).await.unwrap_err();
        assert!(matches!(err, RecipeError::Upload(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_image_without_host_is_upload_error() {
        let svc = RecipeService::new(Arc::new(MemoryRecipeStore::new()), None);
        let err = svc.create(fields(), Some(png())).await.unwrap_err();
        assert!(matches!(err, RecipeError::Upload(MediaError::NotConfigured)));

        // No image, no host needed
        assert!(svc.create(fields(), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_skips_upload() {
        let (svc, host, _) = service(false);
        let id = RecipeId::generate().to_string();
        let err = svc.update(&id, RecipeFields::default(), Some(png())).await.unwrap_err();
        assert!(matches!(err, RecipeError::NotFound(_)));
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_failed_upload_leaves_record() {
        let (svc, _, store) = service(true);
        let created = svc.create(fields(), None).await.unwrap();

        let change = RecipeFields {
            title: Some("Crepes".to_string()),
            ..Default::default()
        };
        let err = svc
            .update(&created.id.to_string(), change, Some(png()))
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::Upload(_)));

        let stored = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_invalid_id_before_lookup() {
        let (svc, _, _) = service(false);
        assert!(matches!(
            svc.get_by_id("not-a-valid-id").await.unwrap_err(),
            RecipeError::InvalidIdentifier(_)
        ));
        assert!(matches!(
            svc.delete("nope").await.unwrap_err(),
            RecipeError::InvalidIdentifier(_)
        ));
    }
}
