//! Calzados Marilo - backend for an online shoe store
//!
//! # Architecture
//! - `storage`: SeaORM backend for catalog, carts, orders and accounts
//! - `api`: HTTP services, JWT auth and middleware
//! - `pricing`: money math for offers, tax and order totals
//! - `cli`: migrate/seed commands
//! - `system`: logging, startup chores and the reservation cleanup task
//! - `config`: TOML + environment configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod notify;
pub mod pricing;
pub mod storage;
pub mod system;
pub mod utils;
