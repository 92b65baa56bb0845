pub mod blog_post;

pub use blog_post::{BlogPostChanges, BlogPostPage, BlogPostRepository, NewBlogPost, blog_post_repository};
