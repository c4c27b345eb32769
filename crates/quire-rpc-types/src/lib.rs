//! Wire types shared by the Quire procedure endpoint and its clients.
//!
//! Every call travels as an [`RpcRequest`] and is answered by an
//! [`RpcResponse`] carrying either a JSON `result` or an [`RpcErrorBody`].
//! Field names are camelCase and timestamps are RFC 3339 strings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Path of the procedure endpoint, relative to the site root.
pub const RPC_PATH: &str = "/api/rpc";

/// Procedure names accepted by the endpoint.
pub mod methods {
    pub const CATEGORIES_CREATE: &str = "categories.create";
    pub const CATEGORIES_GET_ALL: &str = "categories.getAll";
    pub const CATEGORIES_COUNT: &str = "categories.count";
    pub const CATEGORIES_GET_BY_SLUG: &str = "categories.getBySlug";
    pub const CATEGORIES_UPDATE: &str = "categories.update";
    pub const CATEGORIES_DELETE: &str = "categories.delete";

    pub const POSTS_CREATE: &str = "posts.create";
    pub const POSTS_GET_ALL: &str = "posts.getAll";
    pub const POSTS_COUNT: &str = "posts.count";
    pub const POSTS_GET_BY_SLUG: &str = "posts.getBySlug";
    pub const POSTS_GET_BY_CATEGORY: &str = "posts.getByCategory";
    pub const POSTS_UPDATE: &str = "posts.update";
    pub const POSTS_DELETE: &str = "posts.delete";

    pub const ALL: &[&str] = &[
        CATEGORIES_CREATE,
        CATEGORIES_GET_ALL,
        CATEGORIES_COUNT,
        CATEGORIES_GET_BY_SLUG,
        CATEGORIES_UPDATE,
        CATEGORIES_DELETE,
        POSTS_CREATE,
        POSTS_GET_ALL,
        POSTS_COUNT,
        POSTS_GET_BY_SLUG,
        POSTS_GET_BY_CATEGORY,
        POSTS_UPDATE,
        POSTS_DELETE,
    ];
}

// ----- envelopes -----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }
}

/// Request body of the endpoint: one call or a batch answered in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcPayload {
    Batch(Vec<RpcRequest>),
    Single(RpcRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl RpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: u64, error: RpcErrorBody) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Splits the envelope. A missing `result` reads as `null`, the
    /// representation of an absent entity.
    pub fn into_outcome(self) -> Result<Value, RpcErrorBody> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RpcErrorCode {
    BadRequest,
    MethodNotFound,
    Validation,
    Conflict,
    Unavailable,
    Internal,
}

impl RpcErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::MethodNotFound => "method_not_found",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcErrorBody {
    pub code: RpcErrorCode,
    pub message: String,
    /// Field-keyed messages; only populated for `validation` failures.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl RpcErrorBody {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.fields = fields;
        self
    }
}

impl fmt::Display for RpcErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ----- procedure inputs -----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdateInput {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

/// `categoryIds` absent keeps the current links; present (even empty)
/// replaces them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdateInput {
    pub id: i32,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdInput {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlugInput {
    pub slug: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryIdInput {
    pub category_id: i32,
}

// ----- procedure outputs -----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Post row without its category links, as returned by `posts.create`
/// and `posts.update`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub description: String,
    pub slug: String,
    pub image: Option<String>,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostCategoryLinkDto {
    pub post_id: i32,
    pub category_id: i32,
    pub category: CategoryDto,
}

/// Post with its nested category links, shared by `posts.getAll`,
/// `posts.getBySlug` and `posts.getByCategory`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostWithCategoriesDto {
    #[serde(flatten)]
    pub post: PostDto,
    pub categories: Vec<PostCategoryLinkDto>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResult {
    pub success: bool,
}

impl DeleteResult {
    pub const OK: Self = Self { success: true };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_accepts_single_and_batch() {
        let single: RpcPayload =
            serde_json::from_value(json!({"id": 1, "method": "posts.getAll"})).unwrap();
        assert!(matches!(single, RpcPayload::Single(ref req) if req.params.is_null()));

        let batch: RpcPayload = serde_json::from_value(json!([
            {"id": 1, "method": "posts.getAll"},
            {"id": 2, "method": "posts.count", "params": {}}
        ]))
        .unwrap();
        match batch {
            RpcPayload::Batch(requests) => assert_eq!(requests.len(), 2),
            RpcPayload::Single(_) => panic!("expected a batch"),
        }
    }

    #[test]
    fn null_result_reads_as_absent_entity() {
        let response: RpcResponse =
            serde_json::from_value(json!({"id": 7, "result": null})).unwrap();
        assert_eq!(response.into_outcome(), Ok(Value::Null));
    }

    #[test]
    fn error_body_serializes_code_and_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), "Title is required".to_string());
        let body = RpcErrorBody::new(RpcErrorCode::Validation, "invalid input").with_fields(fields);
        let value = serde_json::to_value(RpcResponse::failure(3, body)).unwrap();
        assert_eq!(value["error"]["code"], "validation");
        assert_eq!(value["error"]["fields"]["title"], "Title is required");
        assert!(value.get("result").is_none());
    }

    #[test]
    fn post_input_uses_camel_case_and_defaults() {
        let input: PostInput = serde_json::from_value(json!({
            "title": "Hello World",
            "content": "Long enough content",
            "categoryIds": [4, 5]
        }))
        .unwrap();
        assert_eq!(input.category_ids, vec![4, 5]);
        assert!(!input.published);
        assert!(input.description.is_none());

        let update: PostUpdateInput = serde_json::from_value(json!({
            "id": 1,
            "title": "Hello World",
            "content": "Long enough content"
        }))
        .unwrap();
        assert!(update.category_ids.is_none());
    }

    #[test]
    fn nested_post_flattens_row_fields() {
        let at = time::macros::datetime!(2024-05-01 10:00 UTC);
        let category = CategoryDto {
            id: 2,
            name: "Design".into(),
            description: None,
            slug: "design".into(),
            created_at: at,
            updated_at: at,
        };
        let post = PostWithCategoriesDto {
            post: PostDto {
                id: 1,
                title: "Hello World".into(),
                content: "Some content here".into(),
                description: String::new(),
                slug: "hello-world".into(),
                image: None,
                published: true,
                created_at: at,
                updated_at: at,
            },
            categories: vec![PostCategoryLinkDto {
                post_id: 1,
                category_id: 2,
                category,
            }],
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["slug"], "hello-world");
        assert_eq!(value["createdAt"], "2024-05-01T10:00:00Z");
        assert_eq!(value["categories"][0]["categoryId"], 2);
        assert_eq!(value["categories"][0]["category"]["name"], "Design");

        let back: PostWithCategoriesDto = serde_json::from_value(value).unwrap();
        assert_eq!(back, post);
    }
}
