pub mod blog_post;
pub mod shared;
