// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use recipebox::media::{ImageUpload, MediaError, MediaHost};
use recipebox::recipe::RecipeFields;
use recipebox::store::{MemoryRecipeStore, RecipeStore, SqliteRecipeStore};
use recipebox::RecipeService;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Media host that records uploads and answers with a fixed URL pattern
pub struct FakeMediaHost {
    fail: bool,
    calls: AtomicUsize,
    uploads: Mutex<Vec<ImageUpload>>,
}

impl FakeMediaHost {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// A host whose every upload is rejected
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<ImageUpload> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    fn name(&self) -> &str {
        "fake"
    }

    async fn upload(&self, image: &ImageUpload) -> Result<String, MediaError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MediaError::Rejected {
                status: 502,
                message: "media host unavailable".to_string(),
            });
        }
        self.uploads.lock().push(image.clone());
        Ok(format!("https://media.example.com/recipes/{}.{}", n, image.extension()))
    }
}

/// Service over a fresh in-memory store and the given host
pub fn memory_service(host: Option<Arc<FakeMediaHost>>) -> (RecipeService, Arc<MemoryRecipeStore>) {
    let store = Arc::new(MemoryRecipeStore::new());
    let media = host.map(|h| h as Arc<dyn MediaHost>);
    (RecipeService::new(store.clone(), media), store)
}

/// Service over a SQLite file in a temp dir; keep the TempDir alive
pub fn sqlite_service(host: Option<Arc<FakeMediaHost>>) -> (TempDir, RecipeService, Arc<SqliteRecipeStore>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteRecipeStore::open(temp_dir.path().join("recipes.db")).unwrap());
    let media = host.map(|h| h as Arc<dyn MediaHost>);
    let service = RecipeService::new(store.clone(), media);
    (temp_dir, service, store)
}

/// A complete, valid create payload
pub fn pancake_fields() -> RecipeFields {
    RecipeFields::new("Pancakes", "Whisk everything, fry in butter", &["flour", "milk", "eggs"])
}

/// A small PNG-typed upload
pub fn png_image() -> ImageUpload {
    ImageUpload::new(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a], "image/png")
        .with_file_name("pancakes.png")
}

/// Insert `count` recipes titled `Recipe 0..count`
pub async fn seed(store: &dyn RecipeStore, count: usize) {
    for i in 0..count {
        store
            .insert(recipebox::recipe::NewRecipe {
                title: format!("Recipe {}", i),
                instructions: "Cook".to_string(),
                ingredients: vec!["water".to_string()],
                image_url: None,
            })
            .await
            .unwrap();
    }
}
