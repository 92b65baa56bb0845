use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::TransactionTrait;
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, ErrorBody, ValidationErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::blog_post::*;
use crate::repository::{BlogPostRepository, blog_post_repository};
use crate::state::AppState;

const NOT_FOUND: &str = "Blog post not found";

#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "Blog Posts",
    operation_id = "listBlogPosts",
    summary = "List blog posts with pagination and search",
    description = "Returns one page of blog posts in creation order. `search` keeps posts whose title contains it (case-sensitive). Pages past the end return an empty list.",
    params(BlogPostListQuery),
    responses(
        (status = 200, description = "One page of blog posts", body = BlogPostListResponse),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(search = %query.search))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogPostListQuery>,
) -> Result<Json<BlogPostListResponse>, AppError> {
    let page = PageRequest::from_query(query.page, query.per_page, &state.config.pagination);

    let result = blog_post_repository(&state.db)
        .list(page, &query.search)
        .await?;
    debug!(
        total = result.total,
        page = result.current_page,
        "Listed blog posts"
    );

    Ok(Json(BlogPostListResponse {
        posts: result.items.into_iter().map(Into::into).collect(),
        total_pages: result.total_pages,
        current_page: result.current_page,
    }))
}

#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "Blog Posts",
    operation_id = "createBlogPost",
    summary = "Create a blog post",
    description = "Both `title` and `content` are required non-blank strings. Unknown fields are rejected.",
    request_body = CreateBlogPostRequest,
    responses(
        (status = 201, description = "Blog post created", body = BlogPostResponse),
        (status = 400, description = "Validation error", body = ValidationErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogPostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_post = validate_create_blog_post(payload)?;

    let txn = state.db.begin().await?;
    let model = BlogPostRepository::new(&txn).create(new_post).await?;
    txn.commit().await?;

    info!(id = model.id, "Created blog post");
    Ok((StatusCode::CREATED, Json(BlogPostResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    tag = "Blog Posts",
    operation_id = "getBlogPost",
    summary = "Get a blog post by ID",
    params(("id" = i32, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post", body = BlogPostResponse),
        (status = 404, description = "Blog post not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<BlogPostResponse>, AppError> {
    let model = blog_post_repository(&state.db)
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    tag = "Blog Posts",
    operation_id = "updateBlogPost",
    summary = "Update a blog post",
    description = "Partial update: only supplied fields among `title` and `content` are overwritten. Unknown fields are ignored.",
    params(("id" = i32, Path, description = "Blog post ID")),
    request_body = UpdateBlogPostRequest,
    responses(
        (status = 200, description = "Blog post updated", body = UpdateBlogPostResponse),
        (status = 400, description = "Validation error", body = ValidationErrorBody),
        (status = 404, description = "Blog post not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateBlogPostRequest>,
) -> Result<Json<UpdateBlogPostResponse>, AppError> {
    let changes = validate_update_blog_post(payload)?;

    let txn = state.db.begin().await?;
    let model = BlogPostRepository::new(&txn)
        .update(id, changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    txn.commit().await?;

    info!(id, "Updated blog post");
    Ok(Json(UpdateBlogPostResponse {
        message: "Blog post updated successfully".into(),
        post: model.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    tag = "Blog Posts",
    operation_id = "deleteBlogPost",
    summary = "Delete a blog post",
    description = "Permanently deletes the blog post.",
    params(("id" = i32, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Blog post deleted", body = MessageResponse),
        (status = 404, description = "Blog post not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let txn = state.db.begin().await?;
    let deleted = BlogPostRepository::new(&txn).delete(id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    txn.commit().await?;

    info!(id, "Deleted blog post");
    Ok(Json(MessageResponse::new("Blog post deleted successfully")))
}

#[utoipa::path(
    options,
    path = "/api/blogs/{id}",
    tag = "Blog Posts",
    operation_id = "preflightBlogPost",
    summary = "Acknowledge a preflight request",
    params(("id" = i32, Path, description = "Blog post ID")),
    responses(
        (status = 200, description = "Preflight acknowledged", body = MessageResponse),
    ),
)]
pub async fn preflight_post(AppPath(_id): AppPath<i32>) -> Json<MessageResponse> {
    Json(MessageResponse::new("Preflight request allowed"))
}

fn not_found(id: i32) -> AppError {
    warn!(id, "Blog post not found");
    AppError::NotFound(NOT_FOUND.into())
}
