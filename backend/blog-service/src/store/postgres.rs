/// Postgres-backed Post Store
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, Follow, Group, Post, User};
use crate::store::{NewComment, NewGroup, NewPost, PostOrder, PostQuery, PostSelector, PostStore, PostUpdate};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "id, text, created_at, author_id, group_id, image_key";

fn order_clause(order: PostOrder) -> &'static str {
    match order {
        PostOrder::NewestFirst => "ORDER BY created_at DESC, id DESC",
        PostOrder::OldestFirst => "ORDER BY created_at ASC, id ASC",
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_user(&self, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(group.title)
        .bind(group.slug)
        .bind(group.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn create_post(&self, draft: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (text, author_id, group_id, image_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, created_at, author_id, group_id, image_key
            "#,
        )
        .bind(draft.text)
        .bind(draft.author_id)
        .bind(draft.group_id)
        .bind(draft.image_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, text, created_at, author_id, group_id, image_key FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let order = order_clause(query.order);

        let posts = match &query.selector {
            PostSelector::All => {
                let sql = format!("SELECT {} FROM posts {}", POST_COLUMNS, order);
                sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?
            }
            PostSelector::InGroup(group_id) => {
                let sql = format!(
                    "SELECT {} FROM posts WHERE group_id = $1 {}",
                    POST_COLUMNS, order
                );
                sqlx::query_as::<_, Post>(&sql)
                    .bind(group_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            PostSelector::ByAuthor(author_id) => {
                let sql = format!(
                    "SELECT {} FROM posts WHERE author_id = $1 {}",
                    POST_COLUMNS, order
                );
                sqlx::query_as::<_, Post>(&sql)
                    .bind(author_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            PostSelector::ByAuthorsFollowedBy(follower_id) => {
                let sql = format!(
                    r#"
                    SELECT {} FROM posts p
                    WHERE EXISTS (
                        SELECT 1 FROM follows f
                        WHERE f.follower_id = $1 AND f.author_id = p.author_id
                    )
                    {}
                    "#,
                    POST_COLUMNS, order
                );
                sqlx::query_as::<_, Post>(&sql)
                    .bind(follower_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(posts)
    }

    async fn update_post(&self, id: i64, update: PostUpdate) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $2, group_id = $3, image_key = $4
            WHERE id = $1
            RETURNING id, text, created_at, author_id, group_id, image_key
            "#,
        )
        .bind(id)
        .bind(update.text)
        .bind(update.group_id)
        .bind(update.image_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        // Clearing comment references and removing the post are one atomic
        // operation from the caller's point of view.
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE comments SET post_id = NULL WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }

    async fn create_comment(&self, draft: NewComment) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, text, created_at, author_id
            "#,
        )
        .bind(draft.post_id)
        .bind(draft.author_id)
        .bind(draft.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, text, created_at, author_id FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, text, created_at, author_id
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn insert_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<Follow> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            INSERT INTO follows (follower_id, author_id)
            VALUES ($1, $2)
            RETURNING id, follower_id, author_id, created_at
            "#,
        )
        .bind(follower_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(follow)
    }

    async fn find_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<Option<Follow>> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            SELECT id, follower_id, author_id, created_at
            FROM follows
            WHERE follower_id = $1 AND author_id = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(follower_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(follow)
    }

    async fn delete_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            "DELETE FROM follows WHERE follower_id = $1 AND author_id = $2",
        )
        .bind(follower_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}
