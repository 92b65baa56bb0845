use sea_orm::{DatabaseBackend, DbErr, EntityTrait, MockDatabase};
use serde_json::json;

use blog_server::entity::blog_post;

use crate::common::{ALLOWED_ORIGIN, TestApp, routes};

/// A server whose every query fails with a driver error.
async fn spawn_with_broken_storage() -> TestApp {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset by peer".into())])
        .into_connection();
    TestApp::spawn_with_db(db).await
}

mod post_listing {
    use super::*;

    #[tokio::test]
    async fn empty_store_has_no_pages() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::blogs_query("page=1&per_page=5&search=")).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({"posts": [], "total_pages": 0, "current_page": 1})
        );
    }

    #[tokio::test]
    async fn defaults_to_first_page_of_five() {
        let app = TestApp::spawn().await;
        app.create_numbered_posts(7).await;

        let res = app.get(routes::BLOGS).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.titles(),
            ["Post 1", "Post 2", "Post 3", "Post 4", "Post 5"]
        );
        assert_eq!(res.body["total_pages"], 2);
        assert_eq!(res.body["current_page"], 1);
    }

    #[tokio::test]
    async fn trailing_slash_lists_the_same_page() {
        let app = TestApp::spawn().await;
        app.create_numbered_posts(2).await;

        let res = app.get(routes::BLOGS_SLASH).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.titles(), ["Post 1", "Post 2"]);
        assert_eq!(res.body["current_page"], 1);
    }

    #[tokio::test]
    async fn twelve_posts_make_three_pages() {
        let app = TestApp::spawn().await;
        app.create_numbered_posts(12).await;

        let res = app.get(&routes::blogs_query("page=3&per_page=5")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.titles(), ["Post 11", "Post 12"]);
        assert_eq!(res.body["total_pages"], 3);
        assert_eq!(res.body["current_page"], 3);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_an_error() {
        let app = TestApp::spawn().await;
        app.create_numbered_posts(12).await;

        let res = app.get(&routes::blogs_query("page=4&per_page=5")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["posts"], json!([]));
        assert_eq!(res.body["total_pages"], 3);
        assert_eq!(res.body["current_page"], 4);
    }

    #[tokio::test]
    async fn posts_include_id_title_and_content() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Hello", "World").await;

        let res = app.get(routes::BLOGS).await;

        assert_eq!(
            res.body["posts"],
            json!([{"id": id, "title": "Hello", "content": "World"}])
        );
    }

    #[tokio::test]
    async fn search_matches_case_sensitive_substrings() {
        let app = TestApp::spawn().await;
        app.create_post("First Blog", "one").await;
        app.create_post("Second Blog", "two").await;
        app.create_post("not the first", "three").await;

        let res = app.get(&routes::blogs_query("search=First")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.titles(), ["First Blog"]);
        assert_eq!(res.body["total_pages"], 1);

        let res = app.get(&routes::blogs_query("search=Blog")).await;
        assert_eq!(res.titles(), ["First Blog", "Second Blog"]);

        let res = app.get(&routes::blogs_query("search=Missing")).await;
        assert_eq!(res.body["posts"], json!([]));
        assert_eq!(res.body["total_pages"], 0);
    }

    #[tokio::test]
    async fn search_wildcards_are_literal() {
        let app = TestApp::spawn().await;
        app.create_post("Plain", "one").await;
        app.create_post("50% off", "two").await;

        let res = app.get(&routes::blogs_query("search=%25")).await;
        assert_eq!(res.titles(), ["50% off"]);
    }

    #[tokio::test]
    async fn unparseable_numbers_fall_back_to_defaults() {
        let app = TestApp::spawn().await;
        app.create_numbered_posts(6).await;

        let res = app
            .get(&routes::blogs_query("page=abc&per_page=lots"))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.titles().len(), 5);
        assert_eq!(res.body["current_page"], 1);
    }

    #[tokio::test]
    async fn oversized_pages_are_capped() {
        let app = TestApp::spawn().await;
        app.create_numbered_posts(3).await;

        let res = app.get(&routes::blogs_query("per_page=100000")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.titles().len(), 3);
        assert_eq!(res.body["total_pages"], 1);
    }

    #[tokio::test]
    async fn storage_failure_returns_generic_500() {
        let app = spawn_with_broken_storage().await;

        let res = app.get(routes::BLOGS).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body, json!({"error": "Internal Server Error"}));
        assert!(!res.text.contains("connection reset"));
    }
}

mod post_creation {
    use super::*;

    #[tokio::test]
    async fn create_returns_201_with_new_id() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::BLOGS,
                &json!({"title": "First Blog", "content": "Hello there"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["title"], "First Blog");
        assert_eq!(res.body["content"], "Hello there");
    }

    #[tokio::test]
    async fn trailing_slash_creates_too() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::BLOGS_SLASH, &json!({"title": "Slash", "content": "works"}))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let fetched = app.get(&routes::blog(res.id())).await;
        assert_eq!(fetched.body["title"], "Slash");
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_stored_as_sent() {
        let app = TestApp::spawn().await;
        let id = app.create_post("  Padded  ", "  body  ").await;

        let res = app.get(&routes::blog(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "  Padded  ");
        assert_eq!(res.body["content"], "  body  ");
    }

    #[tokio::test]
    async fn created_post_can_be_fetched() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Fetch me", "Some content").await;

        let res = app.get(&routes::blog(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({"id": id, "title": "Fetch me", "content": "Some content"})
        );

        let stored = blog_post::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .expect("DB query failed")
            .expect("Post not persisted");
        assert_eq!(stored.title, "Fetch me");
    }

    #[tokio::test]
    async fn each_post_gets_a_fresh_id() {
        let app = TestApp::spawn().await;
        let a = app.create_post("A", "a").await;
        let b = app.create_post("B", "b").await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn missing_content_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::BLOGS, &json!({"title": "No body"})).await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body,
            json!({"error": {"content": ["Content is required"]}})
        );
    }

    #[tokio::test]
    async fn every_invalid_field_is_reported() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::BLOGS, &json!({"title": 7, "extra": true}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body,
            json!({"error": {
                "title": ["Not a valid string."],
                "content": ["Content is required"],
                "extra": ["Unknown field."],
            }})
        );
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::BLOGS, &json!({"title": "  ", "content": "x"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"]["title"][0], "Title must not be empty");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::BLOGS, "{not json").await;

        assert_eq!(res.status, 400);
        assert!(res.body["error"]["_schema"].is_array());
    }

    #[tokio::test]
    async fn rejected_payload_stores_nothing() {
        let app = TestApp::spawn().await;

        app.post(routes::BLOGS, &json!({"content": "orphan"})).await;

        let res = app.get(routes::BLOGS).await;
        assert_eq!(res.body["posts"], json!([]));
    }

    #[tokio::test]
    async fn storage_failure_does_not_leak_detail() {
        let app = spawn_with_broken_storage().await;

        let res = app
            .post(routes::BLOGS, &json!({"title": "t", "content": "c"}))
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body, json!({"error": "Internal Server Error"}));
        assert!(!res.text.contains("connection reset"));
    }
}

mod post_retrieval {
    use super::*;

    #[tokio::test]
    async fn unknown_id_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::blog(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body, json!({"error": "Blog post not found"}));
    }

    #[tokio::test]
    async fn non_numeric_id_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get("/api/blogs/abc").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "Blog post not found");
    }
}

mod post_update {
    use super::*;

    #[tokio::test]
    async fn updating_title_keeps_content() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Old title", "Kept content").await;

        let res = app.put(&routes::blog(id), &json!({"title": "X"})).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({
                "message": "Blog post updated successfully",
                "post": {"id": id, "title": "X", "content": "Kept content"},
            })
        );

        let res = app.get(&routes::blog(id)).await;
        assert_eq!(res.body["title"], "X");
        assert_eq!(res.body["content"], "Kept content");
    }

    #[tokio::test]
    async fn updating_both_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_post("a", "b").await;

        let res = app
            .put(&routes::blog(id), &json!({"title": "c", "content": "d"}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["post"]["title"], "c");
        assert_eq!(res.body["post"]["content"], "d");
    }

    #[tokio::test]
    async fn unknown_fields_are_ignored() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Title", "Content").await;

        let res = app
            .put(&routes::blog(id), &json!({"author": "someone"}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["post"]["title"], "Title");
        assert_eq!(res.body["post"]["content"], "Content");
    }

    #[tokio::test]
    async fn blank_values_are_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Title", "Content").await;

        let res = app.put(&routes::blog(id), &json!({"content": ""})).await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body,
            json!({"error": {"content": ["Content must not be empty"]}})
        );

        let res = app.get(&routes::blog(id)).await;
        assert_eq!(res.body["content"], "Content");
    }

    #[tokio::test]
    async fn non_string_values_are_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Title", "Content").await;

        let res = app.put(&routes::blog(id), &json!({"title": 5})).await;

        assert_eq!(res.status, 400);
        assert!(res.body["error"]["_schema"].is_array());
    }

    #[tokio::test]
    async fn unknown_id_is_404() {
        let app = TestApp::spawn().await;

        let res = app.put(&routes::blog(12345), &json!({"title": "X"})).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body, json!({"error": "Blog post not found"}));
    }
}

mod post_deletion {
    use super::*;

    #[tokio::test]
    async fn deleted_post_is_gone() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Doomed", "Soon gone").await;

        let res = app.delete(&routes::blog(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({"message": "Blog post deleted successfully"})
        );

        let res = app.get(&routes::blog(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleting_twice_is_404() {
        let app = TestApp::spawn().await;
        let id = app.create_post("Once", "only").await;

        assert_eq!(app.delete(&routes::blog(id)).await.status, 200);

        let res = app.delete(&routes::blog(id)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body, json!({"error": "Blog post not found"}));
    }

    #[tokio::test]
    async fn deleting_leaves_other_posts() {
        let app = TestApp::spawn().await;
        let ids = app.create_numbered_posts(3).await;

        app.delete(&routes::blog(ids[1])).await;

        let res = app.get(routes::BLOGS).await;
        assert_eq!(res.titles(), ["Post 1", "Post 3"]);
    }
}

mod preflight {
    use super::*;

    #[tokio::test]
    async fn plain_options_gets_static_acknowledgement() {
        let app = TestApp::spawn().await;

        let res = app.options(&routes::blog(1), &[]).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({"message": "Preflight request allowed"}));
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let app = TestApp::spawn().await;

        let res = app
            .options(
                &routes::blog(1),
                &[
                    ("Origin", ALLOWED_ORIGIN),
                    ("Access-Control-Request-Method", "PUT"),
                ],
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.headers
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some(ALLOWED_ORIGIN)
        );
        let methods = res
            .headers
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(methods.contains("PUT"));
    }

    #[tokio::test]
    async fn cors_preflight_ignores_unknown_origin() {
        let app = TestApp::spawn().await;

        let res = app
            .options(
                routes::BLOGS,
                &[
                    ("Origin", "http://evil.example"),
                    ("Access-Control-Request-Method", "POST"),
                ],
            )
            .await;

        assert!(res.headers.get("access-control-allow-origin").is_none());
    }
}

mod api_docs {
    use super::*;

    #[tokio::test]
    async fn openapi_document_lists_blog_routes() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::OPENAPI).await;

        assert_eq!(res.status, 200);
        assert!(res.body["paths"]["/api/blogs"].is_object());
        assert!(res.body["paths"]["/api/blogs/{id}"]["put"].is_object());
    }

    #[tokio::test]
    async fn create_body_is_described_by_the_request_model() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::OPENAPI).await;
        let schemas = &res.body["components"]["schemas"];

        assert!(schemas["CreateBlogPostRequest"]["properties"]["title"].is_object());
        assert!(schemas["CreateBlogPostRequest"]["properties"]["unknown"].is_null());
        assert!(schemas["NewBlogPost"].is_null());
    }
}
