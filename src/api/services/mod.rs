pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod management;
pub mod types;

pub use error_code::ErrorCode;
pub use types::ApiResponse;
