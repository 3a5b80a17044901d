pub mod auth;

pub use auth::StaffAuth;
