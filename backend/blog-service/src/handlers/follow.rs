/// Follow relationship handlers
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::Viewer;
use crate::services::FollowService;

pub async fn follow(
    username: web::Path<String>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let service = FollowService::new(state.store.clone());
    match service.follow(viewer, &username).await? {
        Some(edge) => Ok(HttpResponse::Ok().json(edge)),
        // Self-follow attempts create nothing
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

pub async fn unfollow(
    username: web::Path<String>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let service = FollowService::new(state.store.clone());
    service.unfollow(viewer, &username).await?;
    Ok(HttpResponse::NoContent().finish())
}
