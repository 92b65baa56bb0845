pub mod config;
pub mod cors;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod state;
pub mod telemetry;

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "1.0.0",
        description = "CRUD API for blog posts"
    ),
    paths(
        handlers::blog_post::list_posts,
        handlers::blog_post::create_post,
        handlers::blog_post::get_post,
        handlers::blog_post::update_post,
        handlers::blog_post::delete_post,
        handlers::blog_post::preflight_post,
    ),
    tags(
        (name = "Blog Posts", description = "Blog post CRUD operations"),
    ),
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors::cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", routes::api_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
}
