// src/recipe/validate.rs

//! Declarative validation of recipe write payloads
//!
//! Each field has one rule in [`RULES`]. All rules run so that a client sees
//! every problem in one response.

use super::{NewRecipe, RecipeFields, RecipePatch};
use crate::media::ImageUpload;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Whether absent fields are an error (create) or left alone (update)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// Per-field validation messages, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Message for a single field, if it failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, message)| (*name, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.fields.iter().map(|(_, m)| m.as_str()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, message) in &self.fields {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy)]
enum Check {
    /// Text that is non-empty after trimming
    NonBlankText,
    /// At least one element, none blank
    NonEmptyList,
}

struct Rule {
    field: &'static str,
    check: Check,
}

const RULES: &[Rule] = &[
    Rule { field: "title", check: Check::NonBlankText },
    Rule { field: "instructions", check: Check::NonBlankText },
    Rule { field: "ingredients", check: Check::NonEmptyList },
];

enum FieldValue<'a> {
    Text(Option<&'a str>),
    List(Option<&'a [String]>),
}

fn field_value<'a>(fields: &'a RecipeFields, name: &str) -> FieldValue<'a> {
    match name {
        "title" => FieldValue::Text(fields.title.as_deref()),
        "instructions" => FieldValue::Text(fields.instructions.as_deref()),
        "ingredients" => FieldValue::List(fields.ingredients.as_deref()),
        _ => FieldValue::Text(None),
    }
}

fn check_field(rule: &Rule, value: FieldValue<'_>, mode: ValidationMode) -> Option<String> {
    let field = rule.field;
    match (rule.check, value) {
        (_, FieldValue::Text(None)) | (_, FieldValue::List(None)) => match mode {
            ValidationMode::Create => Some(format!("{} is required", field)),
            ValidationMode::Update => None,
        },
        (Check::NonBlankText, FieldValue::Text(Some(text))) => {
            text.trim().is_empty().then(|| format!("{} must not be empty", field))
        }
        (Check::NonEmptyList, FieldValue::List(Some(items))) => {
            if items.is_empty() {
                Some(format!("{} must contain at least one item", field))
            } else if items.iter().any(|item| item.trim().is_empty()) {
                Some(format!("{} must not contain empty items", field))
            } else {
                None
            }
        }
        (check, _) => Some(format!("{} has the wrong shape for {:?}", field, check)),
    }
}

/// Run every rule against `fields`
pub fn validate(fields: &RecipeFields, mode: ValidationMode) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for rule in RULES {
        if let Some(message) = check_field(rule, field_value(fields, rule.field), mode) {
            errors.add(rule.field, message);
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn trimmed(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string())
}

fn trimmed_list(items: Option<Vec<String>>) -> Option<Vec<String>> {
    items.map(|list| list.into_iter().map(|i| i.trim().to_string()).collect())
}

/// Validate a create payload and normalize it into a [`NewRecipe`]
pub fn validate_new(fields: RecipeFields) -> Result<NewRecipe, ValidationErrors> {
    validate(&fields, ValidationMode::Create)?;

    match (
        trimmed(fields.title),
        trimmed(fields.instructions),
        trimmed_list(fields.ingredients),
    ) {
        (Some(title), Some(instructions), Some(ingredients)) => Ok(NewRecipe {
            title,
            instructions,
            ingredients,
            image_url: None,
        }),
        _ => {
            // validate() already rejected missing fields in create mode
            let mut errors = ValidationErrors::new();
            errors.add("recipe", "recipe is incomplete");
            Err(errors)
        }
    }
}

/// Validate an update payload and normalize it into a [`RecipePatch`]
pub fn validate_patch(fields: RecipeFields) -> Result<RecipePatch, ValidationErrors> {
    validate(&fields, ValidationMode::Update)?;

    Ok(RecipePatch {
        title: trimmed(fields.title),
        instructions: trimmed(fields.instructions),
        ingredients: trimmed_list(fields.ingredients),
        image_url: None,
    })
}

/// Add an `image` error when the upload is not an image, merging with
/// whatever the field rules already reported
pub(super) fn check_image<T>(
    result: Result<T, ValidationErrors>,
    image: Option<&ImageUpload>,
) -> Result<T, ValidationErrors> {
    let bad_image = image.is_some_and(|i| !i.is_image());
    match result {
        Ok(value) if !bad_image => Ok(value),
        Ok(_) => {
            let mut errors = ValidationErrors::new();
            errors.add("image", "image must be an image file");
            Err(errors)
        }
        Err(mut errors) => {
            if bad_image {
                errors.add("image", "image must be an image file");
            }
            Err(errors)
        }
    }
}
