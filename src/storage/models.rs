//! Domain views and inputs shared between the storage backend and the API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order fulfilment states, in progression order.
pub const ORDER_STATUSES: [&str; 3] = ["awaiting_shipment", "in_transit", "delivered"];

/// Supported payment methods.
pub const PAYMENT_METHODS: [&str; 2] = ["cash_on_delivery", "card"];

pub fn is_valid_status(status: &str) -> bool {
    ORDER_STATUSES.contains(&status)
}

pub fn is_valid_payment_method(method: &str) -> bool {
    PAYMENT_METHODS.contains(&method)
}

/// Catalog listing filter. All fields combine with AND.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub gender: Option<String>,
    pub size: Option<i32>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandView {
    pub id: i64,
    pub name: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SizeStock {
    pub size: i32,
    pub stock: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoeImageView {
    pub image_path: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoeSummary {
    pub id: i64,
    pub name: String,
    pub price: i32,
    pub offer_price: Option<i32>,
    pub gender: String,
    pub color: String,
    pub is_featured: bool,
    pub brand: String,
    pub category: Option<String>,
    pub primary_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoeDetail {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub offer_price: Option<i32>,
    pub gender: String,
    pub color: String,
    pub material: String,
    pub is_available: bool,
    pub is_featured: bool,
    pub brand: BrandView,
    pub category: Option<CategoryView>,
    pub sizes: Vec<SizeStock>,
    pub images: Vec<ShoeImageView>,
}

/// Who owns a cart: a logged-in user or an anonymous session.
#[derive(Debug, Clone)]
pub enum CartOwner {
    User(i64),
    Session(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: i64,
    pub shoe_id: i64,
    pub name: String,
    pub size: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub available_stock: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub id: i64,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub total_items: i32,
}

/// One line of a new order, before stock has been reserved.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub shoe_id: i64,
    pub size: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingDetails {
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_postal_code: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_postal_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    pub shoe_id: i64,
    pub name: String,
    pub size: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub discount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub code: String,
    pub status: String,
    pub payment_method: String,
    pub paid: bool,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_cost: Decimal,
    pub total: Decimal,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_postal_code: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_postal_code: String,
    pub items: Vec<OrderLineView>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub code: String,
    pub status: String,
    pub payment_method: String,
    pub paid: bool,
    pub total: Decimal,
    pub item_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Management-side order listing filter.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub paid: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffView {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration input for a new customer account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
}

/// Profile fields a customer (or staff on their behalf) may change.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Staff account creation or update input. A missing password on update
/// keeps the existing one.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffInput {
    pub email: String,
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CustomerFilter {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_customers: u64,
    pub total_staff: u64,
    pub total_shoes: u64,
    pub total_orders: u64,
    pub paid_orders: u64,
    pub pending_shipment: u64,
}
