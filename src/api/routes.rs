//! Route composition for the store API.

use actix_web::web;

use crate::api::middleware::StaffAuth;
use crate::api::services::{auth, cart, catalog, checkout, health, management};

/// Catalog routes `/api/catalog`
///
/// All public; no authentication required.
pub fn catalog_routes() -> actix_web::Scope {
    web::scope("/catalog")
        .route("/shoes", web::get().to(catalog::list_shoes))
        .route("/shoes/{id}/buy-now", web::post().to(catalog::buy_now))
        .route("/shoes/{id}", web::get().to(catalog::get_shoe))
        .route("/brands", web::get().to(catalog::list_brands))
        .route("/categories", web::get().to(catalog::list_categories))
}

/// Cart routes `/api/cart`
///
/// Anonymous callers are identified by the cart session cookie.
pub fn cart_routes() -> actix_web::Scope {
    web::scope("/cart")
        .route("", web::get().to(cart::get_cart))
        .route("", web::delete().to(cart::clear))
        .route("/items", web::post().to(cart::add_item))
        .route("/items/{id}", web::put().to(cart::update_item))
        .route("/items/{id}", web::delete().to(cart::remove_item))
}

/// Order and checkout routes `/api/orders`
///
/// The webhook route carries its own HMAC check instead of auth middleware.
pub fn order_routes() -> actix_web::Scope {
    web::scope("/orders")
        .route("", web::post().to(checkout::start_checkout))
        .route("/webhook", web::post().to(checkout::payment_webhook))
        .route("/mine", web::get().to(checkout::list_my_orders))
        .route("/{code}/contact", web::put().to(checkout::update_contact))
        .route("/{code}/shipping", web::put().to(checkout::update_shipping))
        .route(
            "/{code}/payment-method",
            web::put().to(checkout::set_payment_method),
        )
        .route("/{code}/pay", web::post().to(checkout::pay))
        .route("/{code}", web::get().to(checkout::get_order))
        .route("/{code}", web::delete().to(checkout::cancel_order))
}

/// Account routes `/api/auth`
///
/// Login is rate limited per peer IP.
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/register", web::post().to(auth::register))
        .route(
            "/login",
            web::post().to(auth::login).wrap(auth::login_rate_limiter()),
        )
        .route("/refresh", web::post().to(auth::refresh_token))
        .route("/logout", web::post().to(auth::logout))
        .route("/me", web::get().to(auth::get_profile))
        .route("/me", web::put().to(auth::update_profile))
}

/// Staff routes `/api/management`, wrapped by StaffAuth.
///
/// The middleware changes the scope's service type, so this returns the
/// factory trait instead of the plain `Scope`.
pub fn management_routes() -> impl actix_web::dev::HttpServiceFactory {
    web::scope("/management")
        .wrap(StaffAuth)
        .route("/dashboard", web::get().to(management::dashboard))
        .route("/customers", web::get().to(management::list_customers))
        .route("/customers/{id}", web::get().to(management::get_customer))
        .route("/customers/{id}", web::put().to(management::update_customer))
        .route(
            "/customers/{id}",
            web::delete().to(management::delete_customer),
        )
        .route("/staff", web::get().to(management::list_staff))
        .route("/staff", web::post().to(management::create_staff))
        .route("/staff/{id}", web::put().to(management::update_staff))
        .route("/staff/{id}", web::delete().to(management::delete_staff))
        .route("/orders", web::get().to(management::list_orders))
        .route(
            "/orders/{code}/status",
            web::put().to(management::update_order_status),
        )
        .route("/orders/{code}", web::get().to(management::get_order))
}

/// Everything under `/api`.
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(catalog_routes())
        .service(cart_routes())
        .service(order_routes())
        .service(auth_routes())
        .service(management_routes())
}

/// Health endpoints `/health`, `/health/ready`, `/health/live`.
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("/ready", web::get().to(health::readiness_check))
        .route("/live", web::get().to(health::liveness_check))
        .route("", web::get().to(health::health_check))
        .route("", web::head().to(health::health_check))
}
