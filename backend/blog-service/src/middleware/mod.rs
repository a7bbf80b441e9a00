/// Request identity for blog-service
///
/// Authentication itself happens upstream: the gateway validates the session
/// credential and injects the resolved user id as an `x-user-id` header.
/// Handlers receive the result as an explicit [`Viewer`] value and thread it
/// into every service call, so no ambient request-global user state exists.
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the requesting user, possibly anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn user_id(self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(id),
        }
    }

    /// The authenticated user id, or `Unauthorized` for anonymous viewers.
    pub fn require(self) -> Result<Uuid, AppError> {
        self.user_id()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }

    pub fn is_anonymous(self) -> bool {
        matches!(self, Viewer::Anonymous)
    }
}

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let viewer = match req.headers().get(USER_ID_HEADER) {
            None => Ok(Viewer::Anonymous),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|raw| Uuid::parse_str(raw).ok())
                .map(Viewer::User)
                .ok_or_else(|| {
                    AppError::Unauthorized("invalid user id header".to_string()).into()
                }),
        };
        ready(viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn missing_header_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        let viewer = Viewer::extract(&req).await.unwrap();
        assert!(viewer.is_anonymous());
        assert!(viewer.require().is_err());
    }

    #[actix_web::test]
    async fn valid_header_yields_user() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();
        let viewer = Viewer::extract(&req).await.unwrap();
        assert_eq!(viewer, Viewer::User(id));
        assert_eq!(viewer.require().unwrap(), id);
    }

    #[actix_web::test]
    async fn malformed_header_is_rejected() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        assert!(Viewer::extract(&req).await.is_err());
    }
}
