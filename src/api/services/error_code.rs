//! API error codes returned in the JSON envelope.
//!
//! Grouped by thousands: 1xxx request/auth problems, 2xxx checkout domain
//! problems, 5xxx server faults.

use serde_repr::Serialize_repr;

use crate::errors::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,

    OutOfStock = 2001,
    WindowExpired = 2002,
    PaymentSignature = 2003,

    InternalServerError = 5000,
}

impl From<StoreError> for ErrorCode {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(_) => ErrorCode::BadRequest,
            StoreError::Unauthorized(_) => ErrorCode::Unauthorized,
            StoreError::Forbidden(_) => ErrorCode::Forbidden,
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::Conflict(_) => ErrorCode::Conflict,
            StoreError::OutOfStock(_) => ErrorCode::OutOfStock,
            StoreError::WindowExpired(_) => ErrorCode::WindowExpired,
            StoreError::PaymentSignature(_) => ErrorCode::PaymentSignature,
            _ => ErrorCode::InternalServerError,
        }
    }
}
