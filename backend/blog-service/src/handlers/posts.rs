/// Post and comment handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::Viewer;
use crate::services::{NewCommentInput, NewPostInput, PostService};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
    pub group_id: Option<i64>,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

impl From<PostRequest> for NewPostInput {
    fn from(req: PostRequest) -> Self {
        NewPostInput {
            text: req.text,
            group_id: req.group_id,
            image_key: req.image_key,
        }
    }
}

/// Validation failures are recovered locally: the submitted fields come back
/// with the error so the client can re-present the form unchanged.
fn validation_reply<T: Serialize>(err: &AppError, fields: &T) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": err.to_string(),
        "fields": fields,
    }))
}

pub async fn create_post(
    req: web::Json<PostRequest>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let payload = req.into_inner();
    if let Err(errors) = payload.validate() {
        return Ok(validation_reply(&errors.into(), &payload));
    }

    let service = PostService::new(state.store.clone());
    match service.create_post(viewer, payload.clone().into()).await {
        Ok(post) => Ok(HttpResponse::Created().json(post)),
        Err(err @ AppError::Validation(_)) => Ok(validation_reply(&err, &payload)),
        Err(err) => Err(err),
    }
}

pub async fn post_detail(
    post_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    let (post, comments) = service.post_detail(*post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "post": post,
        "comments": comments,
    })))
}

pub async fn edit_post(
    post_id: web::Path<i64>,
    req: web::Json<PostRequest>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let payload = req.into_inner();
    if let Err(errors) = payload.validate() {
        return Ok(validation_reply(&errors.into(), &payload));
    }

    let service = PostService::new(state.store.clone());
    match service
        .edit_post(viewer, *post_id, payload.clone().into())
        .await
    {
        Ok(post) => Ok(HttpResponse::Ok().json(post)),
        Err(err @ AppError::Validation(_)) => Ok(validation_reply(&err, &payload)),
        Err(err) => Err(err),
    }
}

pub async fn delete_post(
    post_id: web::Path<i64>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    service.delete_post(viewer, *post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn add_comment(
    post_id: web::Path<i64>,
    req: web::Json<CommentRequest>,
    viewer: Viewer,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let payload = req.into_inner();
    if let Err(errors) = payload.validate() {
        return Ok(validation_reply(&errors.into(), &payload));
    }

    let service = PostService::new(state.store.clone());
    let input = NewCommentInput {
        text: payload.text.clone(),
    };
    match service.add_comment(viewer, *post_id, input).await {
        Ok(comment) => Ok(HttpResponse::Created().json(comment)),
        Err(err @ AppError::Validation(_)) => Ok(validation_reply(&err, &payload)),
        Err(err) => Err(err),
    }
}
