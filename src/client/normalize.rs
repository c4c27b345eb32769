//! Lenient decoding of procedure results into the shapes the stores keep.
//!
//! The wire structs accept missing or loosely typed fields; the `normalize_*`
//! functions then apply fixed defaults so views never see a null where they
//! expect text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::listing::Listable;

/// Post as it arrives from the endpoint, before defaults are applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePost {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub published: Value,
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub updated_at: Value,
    #[serde(default)]
    pub categories: Option<Vec<WirePostCategoryLink>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePostCategoryLink {
    #[serde(default)]
    pub post_id: Option<i32>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub category: Option<WireCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCategory {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub updated_at: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategory {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPostCategoryLink {
    pub post_id: i32,
    pub category_id: i32,
    pub category: ApiCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPost {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub published: bool,
    pub categories: Vec<ApiPostCategoryLink>,
}

impl ApiPost {
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|link| link.category.name.as_str())
    }
}

impl Listable for ApiPost {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn has_category(&self, name: &str) -> bool {
        self.category_names().any(|candidate| candidate == name)
    }
}

/// Applies the post defaults:
///
/// * `description` absent or null becomes `""`;
/// * `image` absent becomes `None`;
/// * timestamps keep their string form, epoch milliseconds are rendered as
///   RFC 3339, anything else becomes `None`;
/// * `published` follows truthiness (`null`, `0`, `""` and `false` are false);
/// * `categories` absent becomes an empty list. Links without a nested
///   category are dropped.
pub fn normalize_post(raw: WirePost) -> ApiPost {
    let post_id = raw.id;
    let categories = raw
        .categories
        .unwrap_or_default()
        .into_iter()
        .filter_map(|link| {
            let category = normalize_category(link.category?);
            Some(ApiPostCategoryLink {
                post_id: link.post_id.unwrap_or(post_id),
                category_id: link.category_id.unwrap_or(category.id),
                category,
            })
        })
        .collect();

    ApiPost {
        id: raw.id,
        title: raw.title,
        slug: raw.slug,
        content: raw.content,
        description: raw.description.unwrap_or_default(),
        image: raw.image,
        created_at: timestamp_string(&raw.created_at),
        updated_at: timestamp_string(&raw.updated_at),
        published: truthy(&raw.published),
        categories,
    }
}

/// Applies the category defaults: missing `name` and `slug` become `""`,
/// `description` stays nullable, timestamps as in [`normalize_post`].
pub fn normalize_category(raw: WireCategory) -> ApiCategory {
    ApiCategory {
        id: raw.id,
        name: raw.name,
        slug: raw.slug,
        description: raw.description,
        created_at: timestamp_string(&raw.created_at),
        updated_at: timestamp_string(&raw.updated_at),
    }
}

fn timestamp_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => {
            let millis = number.as_i64()?;
            let nanos = i128::from(millis).checked_mul(1_000_000)?;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .ok()?
                .format(&Rfc3339)
                .ok()
        }
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
