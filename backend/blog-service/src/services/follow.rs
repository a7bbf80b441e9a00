/// Follow relationship manager
///
/// Edge creation is idempotent here (get-or-create) because the store does
/// not enforce pair uniqueness on follow edges.
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::Viewer;
use crate::models::Follow;
use crate::store::PostStore;
use uuid::Uuid;

pub struct FollowService {
    store: Arc<dyn PostStore>,
}

impl FollowService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Follow the author with the given username. Returns the edge, the
    /// already-existing edge for repeated calls, or `None` for a self-follow
    /// attempt, which is a silent no-op.
    pub async fn follow(&self, viewer: Viewer, username: &str) -> Result<Option<Follow>> {
        let follower_id = viewer.require()?;
        let author = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

        if author.id == follower_id {
            return Ok(None);
        }

        if let Some(existing) = self.store.find_follow(follower_id, author.id).await? {
            return Ok(Some(existing));
        }
        self.store
            .insert_follow(follower_id, author.id)
            .await
            .map(Some)
    }

    /// Remove the `(viewer, author)` edge. `NotFound` when no edge exists.
    pub async fn unfollow(&self, viewer: Viewer, username: &str) -> Result<()> {
        let follower_id = viewer.require()?;
        let author = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

        if self.store.delete_follow(follower_id, author.id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "follow edge to '{}'",
                username
            )))
        }
    }

    /// Pure query, safe for anonymous viewers.
    pub async fn is_following(&self, viewer: Viewer, author_id: Uuid) -> Result<bool> {
        match viewer.user_id() {
            None => Ok(false),
            Some(viewer_id) => Ok(self
                .store
                .find_follow(viewer_id, author_id)
                .await?
                .is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn two_users() -> (Arc<dyn PostStore>, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let alice = store.create_user("alice").await.unwrap();
        let bob = store.create_user("bob").await.unwrap();
        (store, alice.id, bob.id)
    }

    #[tokio::test]
    async fn follow_is_idempotent() {
        let (store, alice_id, _) = two_users().await;
        let service = FollowService::new(store);

        let first = service
            .follow(Viewer::User(alice_id), "bob")
            .await
            .unwrap()
            .unwrap();
        let second = service
            .follow(Viewer::User(alice_id), "bob")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn unfollow_removes_exactly_one_edge() {
        let (store, alice_id, bob_id) = two_users().await;
        let service = FollowService::new(store);
        let alice = Viewer::User(alice_id);

        service.follow(alice, "bob").await.unwrap();
        service.follow(alice, "bob").await.unwrap();

        service.unfollow(alice, "bob").await.unwrap();
        assert!(!service.is_following(alice, bob_id).await.unwrap());

        let err = service.unfollow(alice, "bob").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn self_follow_is_a_silent_noop() {
        let (store, alice_id, _) = two_users().await;
        let service = FollowService::new(store);
        let alice = Viewer::User(alice_id);

        assert!(service.follow(alice, "alice").await.unwrap().is_none());
        assert!(!service.is_following(alice, alice_id).await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_viewers_cannot_follow_but_may_query() {
        let (store, _, bob_id) = two_users().await;
        let service = FollowService::new(store);

        let err = service
            .follow(Viewer::Anonymous, "bob")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        assert!(!service
            .is_following(Viewer::Anonymous, bob_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn follow_unknown_username_is_not_found() {
        let (store, alice_id, _) = two_users().await;
        let service = FollowService::new(store);

        let err = service
            .follow(Viewer::User(alice_id), "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
