/// In-memory Post Store
///
/// Backs the integration tests and the `memory` store backend for local
/// development. Semantics mirror [`PgStore`]: sequential ids, newest-first
/// ordering with id tie-break, and comment references cleared on post
/// deletion.
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, Follow, Group, Post, User};
use crate::store::{NewComment, NewGroup, NewPost, PostOrder, PostQuery, PostSelector, PostStore, PostUpdate};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
    next_group_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
    next_follow_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

fn sort_posts(posts: &mut [Post], order: PostOrder) {
    match order {
        PostOrder::NewestFirst => {
            posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
        }
        PostOrder::OldestFirst => {
            posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_user(&self, username: &str) -> Result<User> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.username == username) {
            return Err(AppError::BadRequest(format!(
                "username '{}' is already taken",
                username
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        let mut inner = self.lock();
        if inner.groups.iter().any(|g| g.slug == group.slug) {
            return Err(AppError::BadRequest(format!(
                "group slug '{}' is already taken",
                group.slug
            )));
        }
        inner.next_group_id += 1;
        let group = Group {
            id: inner.next_group_id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        inner.groups.push(group.clone());
        Ok(group)
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.lock().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        Ok(self.lock().groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn create_post(&self, draft: NewPost) -> Result<Post> {
        let mut inner = self.lock();
        inner.next_post_id += 1;
        let post = Post {
            id: inner.next_post_id,
            text: draft.text,
            created_at: Utc::now(),
            author_id: draft.author_id,
            group_id: draft.group_id,
            image_key: draft.image_key,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>> {
        Ok(self.lock().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let inner = self.lock();
        let mut posts: Vec<Post> = match &query.selector {
            PostSelector::All => inner.posts.clone(),
            PostSelector::InGroup(group_id) => inner
                .posts
                .iter()
                .filter(|p| p.group_id == Some(*group_id))
                .cloned()
                .collect(),
            PostSelector::ByAuthor(author_id) => inner
                .posts
                .iter()
                .filter(|p| p.author_id == *author_id)
                .cloned()
                .collect(),
            PostSelector::ByAuthorsFollowedBy(follower_id) => {
                let followed: HashSet<Uuid> = inner
                    .follows
                    .iter()
                    .filter(|f| f.follower_id == *follower_id)
                    .map(|f| f.author_id)
                    .collect();
                inner
                    .posts
                    .iter()
                    .filter(|p| followed.contains(&p.author_id))
                    .cloned()
                    .collect()
            }
        };
        sort_posts(&mut posts, query.order);
        Ok(posts)
    }

    async fn update_post(&self, id: i64, update: PostUpdate) -> Result<Option<Post>> {
        let mut inner = self.lock();
        match inner.posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.text = update.text;
                post.group_id = update.group_id;
                post.image_key = update.image_key;
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let mut inner = self.lock();
        let existed = inner.posts.iter().any(|p| p.id == id);
        if existed {
            for comment in inner.comments.iter_mut().filter(|c| c.post_id == Some(id)) {
                comment.post_id = None;
            }
            inner.posts.retain(|p| p.id != id);
        }
        Ok(existed)
    }

    async fn create_comment(&self, draft: NewComment) -> Result<Comment> {
        let mut inner = self.lock();
        inner.next_comment_id += 1;
        let comment = Comment {
            id: inner.next_comment_id,
            post_id: Some(draft.post_id),
            text: draft.text,
            created_at: Utc::now(),
            author_id: draft.author_id,
        };
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>> {
        Ok(self.lock().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .lock()
            .comments
            .iter()
            .filter(|c| c.post_id == Some(post_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn insert_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<Follow> {
        let mut inner = self.lock();
        inner.next_follow_id += 1;
        let follow = Follow {
            id: inner.next_follow_id,
            follower_id,
            author_id,
            created_at: Utc::now(),
        };
        inner.follows.push(follow.clone());
        Ok(follow)
    }

    async fn find_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<Option<Follow>> {
        Ok(self
            .lock()
            .follows
            .iter()
            .find(|f| f.follower_id == follower_id && f.author_id == author_id)
            .cloned())
    }

    async fn delete_follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut inner = self.lock();
        let before = inner.follows.len();
        inner
            .follows
            .retain(|f| !(f.follower_id == follower_id && f.author_id == author_id));
        Ok(inner.follows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(author_id: Uuid, text: &str) -> NewPost {
        NewPost {
            author_id,
            text: text.to_string(),
            group_id: None,
            image_key: None,
        }
    }

    #[tokio::test]
    async fn lists_posts_newest_first() {
        let store = MemoryStore::new();
        let author = store.create_user("leo").await.unwrap();
        let first = store.create_post(draft(author.id, "first")).await.unwrap();
        let second = store.create_post(draft(author.id, "second")).await.unwrap();

        let posts = store
            .list_posts(&PostQuery::newest(PostSelector::All))
            .await
            .unwrap();

        assert_eq!(
            posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[tokio::test]
    async fn oldest_first_order_reverses_the_listing() {
        let store = MemoryStore::new();
        let author = store.create_user("leo").await.unwrap();
        store.create_post(draft(author.id, "a")).await.unwrap();
        store.create_post(draft(author.id, "b")).await.unwrap();

        let posts = store
            .list_posts(&PostQuery {
                selector: PostSelector::All,
                order: PostOrder::OldestFirst,
            })
            .await
            .unwrap();
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn timestamp_ties_break_by_higher_id() {
        let store = MemoryStore::new();
        let author = store.create_user("leo").await.unwrap();
        store.create_post(draft(author.id, "a")).await.unwrap();
        store.create_post(draft(author.id, "b")).await.unwrap();

        // Force a shared timestamp so only the id decides the order.
        let now = Utc::now();
        {
            let mut inner = store.lock();
            for post in inner.posts.iter_mut() {
                post.created_at = now;
            }
        }

        let posts = store
            .list_posts(&PostQuery::newest(PostSelector::All))
            .await
            .unwrap();
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn group_selector_excludes_other_groups_and_groupless_posts() {
        let store = MemoryStore::new();
        let author = store.create_user("leo").await.unwrap();
        let cats = store
            .create_group(NewGroup {
                title: "Cats".into(),
                slug: "cats".into(),
                description: "cat pictures".into(),
            })
            .await
            .unwrap();
        let dogs = store
            .create_group(NewGroup {
                title: "Dogs".into(),
                slug: "dogs".into(),
                description: "dog pictures".into(),
            })
            .await
            .unwrap();

        let mut cat_post = draft(author.id, "meow");
        cat_post.group_id = Some(cats.id);
        let cat_post = store.create_post(cat_post).await.unwrap();
        let mut dog_post = draft(author.id, "woof");
        dog_post.group_id = Some(dogs.id);
        store.create_post(dog_post).await.unwrap();
        store.create_post(draft(author.id, "no group")).await.unwrap();

        let posts = store
            .list_posts(&PostQuery::newest(PostSelector::InGroup(cats.id)))
            .await
            .unwrap();
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![cat_post.id]);
    }

    #[tokio::test]
    async fn followed_authors_selector_only_returns_their_posts() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice").await.unwrap();
        let bob = store.create_user("bob").await.unwrap();
        let carol = store.create_user("carol").await.unwrap();

        let from_alice = store.create_post(draft(alice.id, "by alice")).await.unwrap();
        store.create_post(draft(bob.id, "by bob")).await.unwrap();
        store.create_post(draft(carol.id, "by carol")).await.unwrap();

        store.insert_follow(bob.id, alice.id).await.unwrap();

        let posts = store
            .list_posts(&PostQuery::newest(PostSelector::ByAuthorsFollowedBy(bob.id)))
            .await
            .unwrap();
        assert_eq!(
            posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![from_alice.id]
        );
    }

    #[tokio::test]
    async fn delete_post_clears_comment_references() {
        let store = MemoryStore::new();
        let author = store.create_user("leo").await.unwrap();
        let post = store.create_post(draft(author.id, "soon gone")).await.unwrap();
        let comment = store
            .create_comment(NewComment {
                post_id: post.id,
                author_id: author.id,
                text: "nice".into(),
            })
            .await
            .unwrap();

        assert!(store.delete_post(post.id).await.unwrap());
        assert!(!store.delete_post(post.id).await.unwrap());

        let comment = store.find_comment(comment.id).await.unwrap().unwrap();
        assert_eq!(comment.post_id, None);
        assert_eq!(comment.text, "nice");
    }
}
