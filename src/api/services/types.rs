//! Request and response types for the JSON API.

use serde::{Deserialize, Serialize};

use crate::storage::models::NewOrderItem;

/// Uniform JSON envelope: `code` is 0 on success, an ErrorCode otherwise.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AuthSuccessResponse {
    pub message: String,
    pub expires_in: u64,
    pub is_staff: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    pub shoe_id: i64,
    pub size: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// Start checkout. Without explicit items the caller's cart is used.
#[derive(Debug, Deserialize)]
pub struct StartCheckoutRequest {
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub payment_method: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentResult {
    pub order_code: String,
    pub payment_reference: String,
    pub paid: bool,
}

/// Payment gateway webhook body.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub order_code: String,
    pub event: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub uptime_seconds: u64,
}
