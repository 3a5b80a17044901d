//! Account endpoints: register, login, refresh, logout, profile.

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info, warn};

use crate::api::identity::AuthUser;
use crate::api::jwt::get_jwt_service;
use crate::storage::SeaOrmStorage;
use crate::storage::models::{CustomerUpdate, RegisterInput};

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, error_from_store, error_response, success_response};
use super::types::{ApiResponse, AuthSuccessResponse, LoginCredentials, MessageResponse};

/// Rate limit key: the TCP peer address, which cannot be spoofed.
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();
        conn_info
            .peer_addr()
            .map(|s| s.to_string())
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }
}

/// One login attempt per second per IP, bursting to five.
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

fn auth_success(user_id: i64, email: &str, is_staff: bool) -> HttpResponse {
    let jwt_service = get_jwt_service();

    let access_token = match jwt_service.generate_access_token(user_id, email, is_staff) {
        Ok(token) => token,
        Err(e) => {
            error!("failed to generate access token: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            );
        }
    };

    let refresh_token = match jwt_service.generate_refresh_token(user_id, email, is_staff) {
        Ok(token) => token,
        Err(e) => {
            error!("failed to generate refresh token: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            );
        }
    };

    let cookie_builder = CookieBuilder::from_config();
    let access_cookie = cookie_builder.build_access_cookie(access_token);
    let refresh_cookie = cookie_builder.build_refresh_cookie(refresh_token);

    HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: 0,
            message: "OK".to_string(),
            data: Some(AuthSuccessResponse {
                message: "Login successful".to_string(),
                expires_in: cookie_builder.access_token_minutes() * 60,
                is_staff,
            }),
        })
}

pub async fn register(
    storage: web::Data<SeaOrmStorage>,
    body: web::Json<RegisterInput>,
) -> ActixResult<impl Responder> {
    match storage.create_customer(&body).await {
        Ok(user) => {
            info!(email = %user.email, "customer registered");
            Ok(auth_success(user.id, &user.email, user.is_staff))
        }
        Err(e) => Ok(error_from_store(&e)),
    }
}

pub async fn login(
    storage: web::Data<SeaOrmStorage>,
    body: web::Json<LoginCredentials>,
) -> ActixResult<impl Responder> {
    match storage.verify_login(&body.email, &body.password).await {
        Ok(user) => {
            info!(email = %user.email, "login successful");
            Ok(auth_success(user.id, &user.email, user.is_staff))
        }
        Err(e) => {
            warn!(email = %body.email, "login failed");
            Ok(error_from_store(&e))
        }
    }
}

pub async fn refresh_token(req: HttpRequest) -> ActixResult<impl Responder> {
    let cookie_builder = CookieBuilder::from_config();

    let refresh_token = match req.cookie(cookie_builder.refresh_cookie_name()) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            warn!("refresh token not found in cookie");
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Refresh token not found",
            ));
        }
    };

    let jwt_service = get_jwt_service();
    let claims = match jwt_service.validate_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("invalid refresh token: {}", e);
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Invalid refresh token",
            ));
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Invalid refresh token",
        ));
    };

    info!(user_id, "token refresh successful");
    Ok(auth_success(user_id, &claims.email, claims.is_staff))
}

pub async fn logout(_req: HttpRequest) -> ActixResult<impl Responder> {
    info!("logout");

    let cookie_builder = CookieBuilder::from_config();
    let access_cookie = cookie_builder.build_expired_access_cookie();
    let refresh_cookie = cookie_builder.build_expired_refresh_cookie();

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: 0,
            message: "OK".to_string(),
            data: Some(MessageResponse {
                message: "Logout successful".to_string(),
            }),
        }))
}

/// The caller's own profile.
pub async fn get_profile(
    storage: web::Data<SeaOrmStorage>,
    user: AuthUser,
) -> ActixResult<impl Responder> {
    match storage.customer_view(user.id).await {
        Ok(view) => Ok(success_response(view)),
        Err(e) => Ok(error_from_store(&e)),
    }
}

pub async fn update_profile(
    storage: web::Data<SeaOrmStorage>,
    user: AuthUser,
    body: web::Json<CustomerUpdate>,
) -> ActixResult<impl Responder> {
    match storage.update_customer(user.id, &body).await {
        Ok(view) => Ok(success_response(view)),
        Err(e) => Ok(error_from_store(&e)),
    }
}
