//! Request identity extractors.
//!
//! Tokens are accepted from the Authorization header (Bearer) or the access
//! cookie, header first.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::errors::StoreError;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub is_staff: bool,
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    bearer.or_else(|| {
        req.cookie(constants::ACCESS_COOKIE_NAME)
            .map(|c| c.value().to_string())
    })
}

/// Decode the caller's access token, if any.
pub fn current_user(req: &HttpRequest) -> Option<AuthUser> {
    let token = token_from_request(req)?;
    let claims = get_jwt_service().validate_access_token(&token).ok()?;
    let id = claims.sub.parse().ok()?;
    Some(AuthUser {
        id,
        email: claims.email,
        is_staff: claims.is_staff,
    })
}

impl FromRequest for AuthUser {
    type Error = StoreError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            current_user(req)
                .ok_or_else(|| StoreError::unauthorized("authentication required")),
        )
    }
}

/// Optional identity: anonymous callers get `MaybeUser(None)`.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl FromRequest for MaybeUser {
    type Error = StoreError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(current_user(req))))
    }
}
