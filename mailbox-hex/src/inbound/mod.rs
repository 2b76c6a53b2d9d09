//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod auth;
pub mod handlers;
pub mod rate_limit;
mod server;

pub use rate_limit::{FixedWindowLimiter, client_address};
pub use server::HttpServer;
