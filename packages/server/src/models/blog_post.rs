use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entity::blog_post;
use crate::error::FieldErrors;
use crate::repository::{BlogPostChanges, NewBlogPost};

pub use super::shared::PageRequest;
use super::shared::lenient_u64;

/// Body of `POST /api/blogs`, kept untyped per field so that every problem
/// can be reported at once instead of failing on the first bad value.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateBlogPostRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, required = true, example = "First Blog")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = String, required = true, example = "This is the first blog post.")]
    pub content: Option<Value>,
    #[serde(flatten)]
    #[schema(ignore)]
    pub unknown: BTreeMap<String, Value>,
}

/// Body of `PUT /api/blogs/{id}`. Unknown fields and `null`s are ignored.
#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UpdateBlogPostRequest {
    #[schema(example = "Updated title")]
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlogPostListQuery {
    /// Page number (1-based). Defaults to 1.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page: Option<u64>,
    /// Posts per page. Defaults to 5.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub per_page: Option<u64>,
    /// Case-sensitive substring to look for in titles.
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BlogPostResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "First Blog")]
    pub title: String,
    #[schema(example = "This is the first blog post.")]
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogPostListResponse {
    pub posts: Vec<BlogPostResponse>,
    #[schema(example = 3)]
    pub total_pages: u64,
    #[schema(example = 1)]
    pub current_page: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UpdateBlogPostResponse {
    #[schema(example = "Blog post updated successfully")]
    pub message: String,
    pub post: BlogPostResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<blog_post::Model> for BlogPostResponse {
    fn from(m: blog_post::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
        }
    }
}

/// Deserialize a field that is present in the body, keeping `null` as
/// `Some(Value::Null)` so it can be told apart from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn required_string(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<Value>,
) -> Option<String> {
    match value {
        None => errors.add(field, format!("{label} is required")),
        Some(Value::Null) => errors.add(field, "Field may not be null."),
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, format!("{label} must not be empty"))
        }
        Some(Value::String(s)) => return Some(s),
        Some(_) => errors.add(field, "Not a valid string."),
    }
    None
}

/// Validate a create payload: `title` and `content` must both be present,
/// non-blank strings and no other field is accepted.
pub fn validate_create_blog_post(req: CreateBlogPostRequest) -> Result<NewBlogPost, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = required_string(&mut errors, "title", "Title", req.title);
    let content = required_string(&mut errors, "content", "Content", req.content);
    for field in req.unknown.keys() {
        errors.add(field.as_str(), "Unknown field.");
    }

    match (title, content) {
        (Some(title), Some(content)) if errors.is_empty() => Ok(NewBlogPost { title, content }),
        _ => Err(errors),
    }
}

/// Validate an update payload: any subset of fields is accepted, but a
/// supplied value must not be blank.
pub fn validate_update_blog_post(req: UpdateBlogPostRequest) -> Result<BlogPostChanges, FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(ref title) = req.title
        && title.trim().is_empty()
    {
        errors.add("title", "Title must not be empty");
    }
    if let Some(ref content) = req.content
        && content.trim().is_empty()
    {
        errors.add("content", "Content must not be empty");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(BlogPostChanges {
        title: req.title,
        content: req.content,
    })
}
