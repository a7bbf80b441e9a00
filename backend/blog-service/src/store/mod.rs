/// Post Store boundary
///
/// The store is the single persistence collaborator of the feed layer.
/// Listing is driven by an explicit [`PostQuery`] specification (selector +
/// order) handed to the store in one call, so there is no deferred query
/// building on the caller side.
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, Follow, Group, Post, User};

/// Which posts to select
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSelector {
    All,
    InGroup(i64),
    ByAuthor(Uuid),
    /// Posts whose author is followed by the given user
    ByAuthorsFollowedBy(Uuid),
}

/// Listing order. Ties on the timestamp are broken by id, so the order is
/// deterministic regardless of timestamp resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone)]
pub struct PostQuery {
    pub selector: PostSelector,
    pub order: PostOrder,
}

impl PostQuery {
    pub fn newest(selector: PostSelector) -> Self {
        Self {
            selector,
            order: PostOrder::NewestFirst,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<i64>,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub text: String,
    pub group_id: Option<i64>,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: Uuid,
    pub text: String,
}

/// Persistence operations consumed by the feed, follow and post services.
///
/// Every write touches a single logical record and relies on the backing
/// store's per-operation atomicity; `delete_post` additionally clears the
/// post reference on the post's comments in the same operation.
#[async_trait]
pub trait PostStore: Send + Sync {
    // Users
    async fn create_user(&self, username: &str) -> Result<User>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // Groups
    async fn create_group(&self, group: NewGroup) -> Result<Group>;
    async fn find_group(&self, id: i64) -> Result<Option<Group>>;
    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>>;

    // Posts
    async fn create_post(&self, draft: NewPost) -> Result<Post>;
    async fn find_post(&self, id: i64) -> Result<Option<Post>>;
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>>;
    async fn update_post(&self, id: i64, update: PostUpdate) -> Result<Option<Post>>;
    /// Deletes the post and clears `post_id` on its comments. Returns false
    /// when no such post exists.
    async fn delete_post(&self, id: i64) -> Result<bool>;

    // Comments
    async fn create_comment(&self, draft: NewComment) -> Result<Comment>;
    async fn find_comment(&self, id: i64) -> Result<Option<Comment>>;
    /// Comments of a post, newest first.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>>;

    // Follow edges. Pair idempotency lives in the follow service, not here.
    async fn insert_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<Follow>;
    async fn find_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<Option<Follow>>;
    /// Returns false when no `(follower, author)` edge exists.
    async fn delete_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool>;
}
