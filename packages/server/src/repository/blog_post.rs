use sea_orm::sea_query::{Condition, Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entity::blog_post;
use crate::models::shared::{PageRequest, escape_like};

/// A validated post ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlogPost {
    pub title: String,
    pub content: String,
}

/// Field-level changes for a partial update. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl BlogPostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// One page of posts plus the metadata needed to render pagination.
#[derive(Debug, Clone)]
pub struct BlogPostPage {
    pub items: Vec<blog_post::Model>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

pub struct BlogPostRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> BlogPostRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// List posts in primary key order, optionally keeping only titles that
    /// contain `search` (case-sensitive). Pages past the end are empty.
    pub async fn list(&self, page: PageRequest, search: &str) -> Result<BlogPostPage, DbErr> {
        let mut query = blog_post::Entity::find();

        if !search.is_empty() {
            query = query.filter(title_contains(self.conn.get_database_backend(), search));
        }

        let total = query.clone().count(self.conn).await?;
        let offset = page.offset();

        let items = if offset >= total {
            Vec::new()
        } else {
            query
                .order_by_asc(blog_post::Column::Id)
                .offset(offset)
                .limit(page.per_page)
                .all(self.conn)
                .await?
        };

        Ok(BlogPostPage {
            items,
            total,
            total_pages: total.div_ceil(page.per_page),
            current_page: page.page,
        })
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<blog_post::Model>, DbErr> {
        blog_post::Entity::find_by_id(id).one(self.conn).await
    }

    pub async fn create(&self, post: NewBlogPost) -> Result<blog_post::Model, DbErr> {
        let model = blog_post::ActiveModel {
            title: Set(post.title),
            content: Set(post.content),
            ..Default::default()
        };

        model.insert(self.conn).await
    }

    /// Apply `changes` to the post. Returns `None` if no post has this id.
    pub async fn update(
        &self,
        id: i32,
        changes: BlogPostChanges,
    ) -> Result<Option<blog_post::Model>, DbErr> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(existing));
        }

        let mut active: blog_post::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }

        active.update(self.conn).await.map(Some)
    }

    /// Hard-delete the post. Returns `false` if no post has this id.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = blog_post::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}

/// Case-sensitive substring match on the title. SQLite's LIKE ignores ASCII
/// case, so it gets `instr` instead.
fn title_contains(backend: DbBackend, term: &str) -> Condition {
    match backend {
        DbBackend::Sqlite => Condition::all().add(Expr::cust_with_values(
            "instr(\"title\", ?) > 0",
            [term.to_owned()],
        )),
        _ => Condition::all().add(
            blog_post::Column::Title
                .like(LikeExpr::new(format!("%{}%", escape_like(term))).escape('\\')),
        ),
    }
}

/// Create a BlogPostRepository with a DatabaseConnection.
pub fn blog_post_repository(db: &DatabaseConnection) -> BlogPostRepository<'_, DatabaseConnection> {
    BlogPostRepository::new(db)
}
