//! Input contracts for category and post mutations.
//!
//! Both the procedure layer and the admin client run these checks. A failed
//! check yields [`ValidationErrors`], a field-keyed map holding the first
//! message reported for each field.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use super::slug::{SlugError, derive_slug};

pub const CATEGORY_NAME_MIN_CHARS: usize = 2;
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;
pub const POST_TITLE_MIN_CHARS: usize = 3;
pub const POST_TITLE_MAX_CHARS: usize = 200;
pub const POST_CONTENT_MIN_CHARS: usize = 10;
pub const POST_DESCRIPTION_MIN_CHARS: usize = 10;
pub const POST_IMAGE_MAX_CHARS: usize = 500;
pub const MAX_POST_CATEGORIES: usize = 3;

pub mod fields {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
    pub const IMAGE: &str = "image";
    pub const CATEGORY_IDS: &str = "categoryIds";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` unless the field already carries one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid input")?;
        let mut separator = ": ";
        for (field, message) in self.iter() {
            write!(f, "{separator}{field}: {message}")?;
            separator = "; ";
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validated category input with its derived slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    pub fn parse(name: &str, description: Option<&str>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = name.trim();
        let length = name.chars().count();
        if length < CATEGORY_NAME_MIN_CHARS {
            errors.add(fields::NAME, "Name is too short");
        } else if length > CATEGORY_NAME_MAX_CHARS {
            errors.add(fields::NAME, "Name is too long");
        }
        let slug = slug_or_error(name, fields::NAME, "Name", &mut errors);

        let description = optional_text(description);

        errors.finish(Self {
            name: name.to_string(),
            slug,
            description,
        })
    }
}

/// Raw post fields as submitted by a caller.
#[derive(Debug, Clone, Copy)]
pub struct PostFields<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
    pub published: bool,
    /// `None` leaves the current category links untouched.
    pub category_ids: Option<&'a [i32]>,
}

/// Validated post input with its derived slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: String,
    pub image: Option<String>,
    pub published: bool,
    pub category_ids: Option<Vec<i32>>,
}

impl PostDraft {
    /// Checks every field and reports all failures at once.
    ///
    /// `description` may be omitted (stored as an empty string) but must be
    /// long enough when present. Category ids are de-duplicated in order.
    pub fn parse(input: PostFields<'_>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = input.title.trim();
        let length = title.chars().count();
        if length < POST_TITLE_MIN_CHARS {
            errors.add(fields::TITLE, "Title is required");
        } else if length > POST_TITLE_MAX_CHARS {
            errors.add(fields::TITLE, "Title is too long");
        }
        let slug = slug_or_error(title, fields::TITLE, "Title", &mut errors);

        if input.content.trim().chars().count() < POST_CONTENT_MIN_CHARS {
            errors.add(fields::CONTENT, "Content too short");
        }

        let description = optional_text(input.description).unwrap_or_default();
        if !description.is_empty() && description.chars().count() < POST_DESCRIPTION_MIN_CHARS {
            errors.add(fields::DESCRIPTION, "Description too short");
        }

        let image = optional_text(input.image);
        if let Some(image) = image.as_deref() {
            if image.chars().count() > POST_IMAGE_MAX_CHARS {
                errors.add(fields::IMAGE, "Image URL is too long");
            } else if !is_web_url(image) {
                errors.add(fields::IMAGE, "Invalid image URL");
            }
        }

        let category_ids = input
            .category_ids
            .map(|ids| validate_category_ids(ids, &mut errors));

        errors.finish(Self {
            title: title.to_string(),
            slug,
            content: input.content.to_string(),
            description,
            image,
            published: input.published,
            category_ids,
        })
    }
}

/// De-duplicates `ids` in order and enforces [`MAX_POST_CATEGORIES`].
pub fn validate_category_ids(ids: &[i32], errors: &mut ValidationErrors) -> Vec<i32> {
    let mut unique: Vec<i32> = Vec::with_capacity(ids.len());
    for &id in ids {
        if id <= 0 {
            errors.add(fields::CATEGORY_IDS, "Category ids must be positive");
        } else if !unique.contains(&id) {
            unique.push(id);
        }
    }
    if unique.len() > MAX_POST_CATEGORIES {
        errors.add(
            fields::CATEGORY_IDS,
            format!("Select at most {MAX_POST_CATEGORIES} categories"),
        );
    }
    unique
}

fn slug_or_error(
    source: &str,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> String {
    match derive_slug(source) {
        Ok(slug) => slug,
        Err(SlugError::EmptyInput) => String::new(),
        Err(SlugError::Unrepresentable { .. }) => {
            errors.add(field, format!("{label} must contain letters or digits"));
            String::new()
        }
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn is_web_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
