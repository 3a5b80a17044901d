//! Shared API constants.

pub const ACCESS_COOKIE_NAME: &str = "cm_access_token";
pub const REFRESH_COOKIE_NAME: &str = "cm_refresh_token";
pub const CART_SESSION_COOKIE_NAME: &str = "cm_cart_session";

pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Payment-Signature";
