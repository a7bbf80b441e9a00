/// Post and comment lifecycle - creation, edit, deletion, comments
///
/// Ownership is checked here at the boundary: only the author may edit or
/// delete a post. The data model itself carries no authorization.
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::Viewer;
use crate::models::{Comment, Post};
use crate::store::{NewComment, NewPost, PostStore, PostUpdate};

pub struct PostService {
    store: Arc<dyn PostStore>,
}

#[derive(Debug, Clone)]
pub struct NewPostInput {
    pub text: String,
    pub group_id: Option<i64>,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCommentInput {
    pub text: String,
}

fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    Ok(())
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    async fn require_group_exists(&self, group_id: Option<i64>) -> Result<()> {
        if let Some(id) = group_id {
            self.store
                .find_group(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("group {}", id)))?;
        }
        Ok(())
    }

    pub async fn create_post(&self, viewer: Viewer, input: NewPostInput) -> Result<Post> {
        let author_id = viewer.require()?;
        require_text(&input.text)?;
        self.require_group_exists(input.group_id).await?;

        self.store
            .create_post(NewPost {
                author_id,
                text: input.text,
                group_id: input.group_id,
                image_key: input.image_key,
            })
            .await
    }

    pub async fn edit_post(
        &self,
        viewer: Viewer,
        post_id: i64,
        input: NewPostInput,
    ) -> Result<Post> {
        let editor_id = viewer.require()?;
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
        if post.author_id != editor_id {
            return Err(AppError::Unauthorized(
                "only the author may edit a post".to_string(),
            ));
        }
        require_text(&input.text)?;
        self.require_group_exists(input.group_id).await?;

        self.store
            .update_post(
                post_id,
                PostUpdate {
                    text: input.text,
                    group_id: input.group_id,
                    image_key: input.image_key,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
    }

    /// Delete a post; the store clears the post reference on its comments
    /// instead of deleting them.
    pub async fn delete_post(&self, viewer: Viewer, post_id: i64) -> Result<()> {
        let deleter_id = viewer.require()?;
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
        if post.author_id != deleter_id {
            return Err(AppError::Unauthorized(
                "only the author may delete a post".to_string(),
            ));
        }

        self.store.delete_post(post_id).await?;
        Ok(())
    }

    pub async fn post_detail(&self, post_id: i64) -> Result<(Post, Vec<Comment>)> {
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
        let comments = self.store.list_comments(post_id).await?;
        Ok((post, comments))
    }

    pub async fn add_comment(
        &self,
        viewer: Viewer,
        post_id: i64,
        input: NewCommentInput,
    ) -> Result<Comment> {
        let author_id = viewer.require()?;
        require_text(&input.text)?;
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        self.store
            .create_comment(NewComment {
                post_id,
                author_id,
                text: input.text,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn text_input(text: &str) -> NewPostInput {
        NewPostInput {
            text: text.to_string(),
            group_id: None,
            image_key: None,
        }
    }

    async fn store_with_author() -> (Arc<dyn PostStore>, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let author = store.create_user("author").await.unwrap();
        (store, author.id)
    }

    #[tokio::test]
    async fn anonymous_creation_is_unauthorized() {
        let (store, _) = store_with_author().await;
        let service = PostService::new(store);

        let err = service
            .create_post(Viewer::Anonymous, text_input("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn blank_text_fails_validation() {
        let (store, author_id) = store_with_author().await;
        let service = PostService::new(store);

        let err = service
            .create_post(Viewer::User(author_id), text_input("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_group_reference_is_not_found() {
        let (store, author_id) = store_with_author().await;
        let service = PostService::new(store);

        let mut input = text_input("hello");
        input.group_id = Some(42);
        let err = service
            .create_post(Viewer::User(author_id), input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_the_author_may_edit() {
        let (store, author_id) = store_with_author().await;
        let intruder = store.create_user("intruder").await.unwrap();
        let service = PostService::new(store);

        let post = service
            .create_post(Viewer::User(author_id), text_input("original"))
            .await
            .unwrap();

        let err = service
            .edit_post(Viewer::User(intruder.id), post.id, text_input("hijacked"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let edited = service
            .edit_post(Viewer::User(author_id), post.id, text_input("revised"))
            .await
            .unwrap();
        assert_eq!(edited.text, "revised");
        assert_eq!(edited.created_at, post.created_at);
    }

    #[tokio::test]
    async fn commenting_on_missing_post_is_not_found() {
        let (store, author_id) = store_with_author().await;
        let service = PostService::new(store);

        let err = service
            .add_comment(
                Viewer::User(author_id),
                999,
                NewCommentInput {
                    text: "hello".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn detail_returns_comments_newest_first() {
        let (store, author_id) = store_with_author().await;
        let service = PostService::new(store.clone());
        let viewer = Viewer::User(author_id);

        let post = service
            .create_post(viewer, text_input("commented"))
            .await
            .unwrap();
        for text in ["first", "second"] {
            service
                .add_comment(viewer, post.id, NewCommentInput { text: text.into() })
                .await
                .unwrap();
        }

        let (_, comments) = service.post_detail(post.id).await.unwrap();
        assert_eq!(
            comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["second", "first"]
        );
    }
}
