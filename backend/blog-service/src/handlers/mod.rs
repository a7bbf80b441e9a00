/// HTTP endpoints for blog-service
pub mod feed;
pub mod follow;
pub mod posts;

use actix_web::web;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::PageCache;
use crate::config::Config;
use crate::store::PostStore;

/// Shared per-process state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub page_cache: PageCache,
    pub page_size: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn PostStore>, config: &Config) -> Self {
        Self {
            store,
            page_cache: PageCache::new(Duration::from_secs(config.feed.index_cache_ttl_secs)),
            page_size: config.feed.page_size,
        }
    }
}

/// Route table, shared between `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feed::global_feed))
        .route("/groups/{slug}/posts", web::get().to(feed::group_feed))
        .route("/users/{username}/posts", web::get().to(feed::profile_feed))
        .route("/feed/following", web::get().to(feed::follow_feed))
        .route("/posts", web::post().to(posts::create_post))
        .route("/posts/{id}", web::get().to(posts::post_detail))
        .route("/posts/{id}", web::put().to(posts::edit_post))
        .route("/posts/{id}", web::delete().to(posts::delete_post))
        .route("/posts/{id}/comments", web::post().to(posts::add_comment))
        .route("/users/{username}/follow", web::post().to(follow::follow))
        .route(
            "/users/{username}/follow",
            web::delete().to(follow::unfollow),
        )
        .route("/admin/cache/clear", web::post().to(feed::clear_page_cache));
}
