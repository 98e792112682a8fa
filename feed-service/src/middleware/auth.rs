//! Gateway-forwarded identity.
//!
//! Authentication terminates at the API gateway; services trust the user id
//! it forwards in the `x-user-id` header. `UserId` rejects requests without
//! one, `MaybeUserId` admits anonymous traffic (public feed).

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Required authenticated identity.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

/// Optional identity for endpoints that serve anonymous requests too.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUserId(pub Option<Uuid>);

fn header_user_id(req: &HttpRequest) -> Result<Option<Uuid>, AppError> {
    match req.headers().get(USER_ID_HEADER) {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Malformed user id header".to_string()))?;
            let id = Uuid::parse_str(raw)
                .map_err(|_| AppError::Unauthorized("Malformed user id header".to_string()))?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match header_user_id(req) {
            Ok(Some(id)) => Ok(UserId(id)),
            Ok(None) => Err(AppError::Unauthorized("Missing user context".to_string())),
            Err(e) => Err(e),
        })
    }
}

impl FromRequest for MaybeUserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(header_user_id(req).map(MaybeUserId))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_rt::test]
    async fn test_user_id_extracts_header() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "550e8400-e29b-41d4-a716-446655440000"))
            .to_http_request();
        let user = UserId::extract(&req).await.unwrap();
        assert_eq!(
            user.0,
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
        );
    }

    #[actix_rt::test]
    async fn test_user_id_missing_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            UserId::extract(&req).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_rt::test]
    async fn test_maybe_user_id_allows_anonymous() {
        let req = TestRequest::default().to_http_request();
        let user = MaybeUserId::extract(&req).await.unwrap();
        assert!(user.0.is_none());
    }

    #[actix_rt::test]
    async fn test_malformed_header_is_rejected_even_when_optional() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        assert!(MaybeUserId::extract(&req).await.is_err());
    }
}
