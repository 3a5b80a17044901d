pub mod constants;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod routes;
pub mod services;
