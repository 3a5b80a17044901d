use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum StoreError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    OutOfStock(String),
    WindowExpired(String),
    PaymentSignature(String),
    PasswordHash(String),
    Serialization(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DatabaseConfig(_) => "E001",
            StoreError::DatabaseConnection(_) => "E002",
            StoreError::DatabaseOperation(_) => "E003",
            StoreError::Validation(_) => "E004",
            StoreError::NotFound(_) => "E005",
            StoreError::Unauthorized(_) => "E006",
            StoreError::Forbidden(_) => "E007",
            StoreError::Conflict(_) => "E008",
            StoreError::OutOfStock(_) => "E009",
            StoreError::WindowExpired(_) => "E010",
            StoreError::PaymentSignature(_) => "E011",
            StoreError::PasswordHash(_) => "E012",
            StoreError::Serialization(_) => "E013",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            StoreError::DatabaseConfig(_) => "Database Configuration Error",
            StoreError::DatabaseConnection(_) => "Database Connection Error",
            StoreError::DatabaseOperation(_) => "Database Operation Error",
            StoreError::Validation(_) => "Validation Error",
            StoreError::NotFound(_) => "Resource Not Found",
            StoreError::Unauthorized(_) => "Unauthorized",
            StoreError::Forbidden(_) => "Forbidden",
            StoreError::Conflict(_) => "Conflict",
            StoreError::OutOfStock(_) => "Out Of Stock",
            StoreError::WindowExpired(_) => "Checkout Window Expired",
            StoreError::PaymentSignature(_) => "Payment Signature Error",
            StoreError::PasswordHash(_) => "Password Hash Error",
            StoreError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            StoreError::DatabaseConfig(msg)
            | StoreError::DatabaseConnection(msg)
            | StoreError::DatabaseOperation(msg)
            | StoreError::Validation(msg)
            | StoreError::NotFound(msg)
            | StoreError::Unauthorized(msg)
            | StoreError::Forbidden(msg)
            | StoreError::Conflict(msg)
            | StoreError::OutOfStock(msg)
            | StoreError::WindowExpired(msg)
            | StoreError::PaymentSignature(msg)
            | StoreError::PasswordHash(msg)
            | StoreError::Serialization(msg) => msg,
        }
    }

    /// HTTP status the API layer maps this error to.
    pub fn http_status(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Unauthorized(_) | StoreError::PaymentSignature(_) => {
                StatusCode::UNAUTHORIZED
            }
            StoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            StoreError::Conflict(_) | StoreError::OutOfStock(_) => StatusCode::CONFLICT,
            StoreError::WindowExpired(_) => StatusCode::GONE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        StoreError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        StoreError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        StoreError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        StoreError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        StoreError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        StoreError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        StoreError::Forbidden(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        StoreError::Conflict(msg.into())
    }

    pub fn out_of_stock<T: Into<String>>(msg: T) -> Self {
        StoreError::OutOfStock(msg.into())
    }

    pub fn window_expired<T: Into<String>>(msg: T) -> Self {
        StoreError::WindowExpired(msg.into())
    }

    pub fn payment_signature<T: Into<String>>(msg: T) -> Self {
        StoreError::PaymentSignature(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        StoreError::PasswordHash(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        StoreError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
