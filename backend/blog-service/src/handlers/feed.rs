/// Feed listing handlers
///
/// The global feed is the only endpoint served through the page cache; group,
/// profile and follow listings are always composed fresh.
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::Viewer;
use crate::pagination::parse_page_param;
use crate::services::FeedService;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// Raw query value; anything unparseable falls back to page 1
    pub page: Option<String>,
}

impl PageParams {
    fn number(&self) -> Option<u32> {
        parse_page_param(self.page.as_deref())
    }
}

fn cache_key(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}

pub async fn global_feed(
    req: HttpRequest,
    query: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let key = cache_key(&req);
    if let Some(body) = state.page_cache.get(&key) {
        return Ok(HttpResponse::Ok()
            .content_type("application/json")
            .body(body));
    }

    let service = FeedService::new(state.store.clone());
    let page = service.global_feed(query.number(), state.page_size).await?;

    let body = serde_json::to_vec(&page)?;
    state.page_cache.insert(key, body.clone());

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

pub async fn group_feed(
    slug: web::Path<String>,
    query: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let service = FeedService::new(state.store.clone());
    let (group, page) = service
        .group_feed(&slug, query.number(), state.page_size)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "group": group,
        "page": page,
    })))
}

pub async fn profile_feed(
    username: web::Path<String>,
    query: web::Query<PageParams>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let service = FeedService::new(state.store.clone());
    let profile = service
        .profile_feed(&username, viewer, query.number(), state.page_size)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "author": profile.author,
        "following": profile.following,
        "page": profile.page,
    })))
}

pub async fn follow_feed(
    query: web::Query<PageParams>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let service = FeedService::new(state.store.clone());
    let page = service
        .follow_feed(viewer, query.number(), state.page_size)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Evict the page cache, forcing the next index request to compose fresh.
pub async fn clear_page_cache(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.page_cache.clear();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "cleared": true })))
}
