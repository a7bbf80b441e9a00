/// Feed composition - the ordered post sequence behind each listing page
///
/// Every view is derived from current store state at call time; the only
/// memoization in the system is the page cache sitting in front of the
/// global feed handler.
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::Viewer;
use crate::models::{Group, Post, User};
use crate::pagination::{paginate, Page};
use crate::store::{PostQuery, PostSelector, PostStore};

pub struct FeedService {
    store: Arc<dyn PostStore>,
}

/// Profile listing plus the viewer-specific follow flag.
#[derive(Debug)]
pub struct ProfileFeed {
    pub author: User,
    pub following: bool,
    pub page: Page<Post>,
}

impl FeedService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// All posts, newest first.
    pub async fn global_feed(&self, page: Option<u32>, page_size: usize) -> Result<Page<Post>> {
        let posts = self
            .store
            .list_posts(&PostQuery::newest(PostSelector::All))
            .await?;
        Ok(paginate(posts, page_size, page))
    }

    /// Posts of a single group, newest first.
    pub async fn group_feed(
        &self,
        slug: &str,
        page: Option<u32>,
        page_size: usize,
    ) -> Result<(Group, Page<Post>)> {
        let group = self
            .store
            .find_group_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{}'", slug)))?;
        let posts = self
            .store
            .list_posts(&PostQuery::newest(PostSelector::InGroup(group.id)))
            .await?;
        Ok((group, paginate(posts, page_size, page)))
    }

    /// Posts of a single author, newest first, with the viewer's follow flag.
    pub async fn profile_feed(
        &self,
        username: &str,
        viewer: Viewer,
        page: Option<u32>,
        page_size: usize,
    ) -> Result<ProfileFeed> {
        let author = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

        let following = match viewer.user_id() {
            Some(viewer_id) => self.store.find_follow(viewer_id, author.id).await?.is_some(),
            None => false,
        };

        let posts = self
            .store
            .list_posts(&PostQuery::newest(PostSelector::ByAuthor(author.id)))
            .await?;

        Ok(ProfileFeed {
            author,
            following,
            page: paginate(posts, page_size, page),
        })
    }

    /// Posts of the authors the viewer follows, newest first. The viewer's
    /// own posts never appear here because self-follow edges are never
    /// created.
    pub async fn follow_feed(
        &self,
        viewer: Viewer,
        page: Option<u32>,
        page_size: usize,
    ) -> Result<Page<Post>> {
        let viewer_id = viewer.require()?;
        let posts = self
            .store
            .list_posts(&PostQuery::newest(PostSelector::ByAuthorsFollowedBy(
                viewer_id,
            )))
            .await?;
        Ok(paginate(posts, page_size, page))
    }
}
