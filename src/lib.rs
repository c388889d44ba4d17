pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

/// The single-tenant business row the engine serves.
pub const DEFAULT_BUSINESS_ID: i64 = 1;
