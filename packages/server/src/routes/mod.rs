use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    let collection =
        get(handlers::blog_post::list_posts).post(handlers::blog_post::create_post);

    // Browser clients call the collection with a trailing slash.
    Router::new()
        .route("/blogs", collection.clone())
        .route("/blogs/", collection)
        .route(
            "/blogs/{id}",
            get(handlers::blog_post::get_post)
                .put(handlers::blog_post::update_post)
                .delete(handlers::blog_post::delete_post)
                .options(handlers::blog_post::preflight_post),
        )
}
