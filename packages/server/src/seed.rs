use sea_orm::*;
use tracing::info;

use crate::entity::blog_post;
use crate::repository::{BlogPostRepository, NewBlogPost};

/// Sample posts inserted into an empty database.
const SAMPLE_POSTS: &[(&str, &str)] = &[
    ("First Blog", "This is the first seeded blog post."),
    ("Second Blog", "Another seeded blog post!"),
];

/// Seed the `blog_post` table with sample posts. Does nothing when the table
/// already has rows. Returns the number of posts inserted.
pub async fn seed_sample_posts(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let existing = blog_post::Entity::find().count(db).await?;
    if existing > 0 {
        info!(existing, "Blog posts already present, skipping seed");
        return Ok(0);
    }

    let txn = db.begin().await?;
    let repo = BlogPostRepository::new(&txn);
    for &(title, content) in SAMPLE_POSTS {
        repo.create(NewBlogPost {
            title: title.to_string(),
            content: content.to_string(),
        })
        .await?;
    }
    txn.commit().await?;

    info!("Seeded {} blog posts", SAMPLE_POSTS.len());
    Ok(SAMPLE_POSTS.len() as u64)
}
