//! HTTP API: server, routing, and request/response mapping for the auth core.

pub mod app;
pub mod config;
pub mod context;
pub mod cookies;
pub mod middleware;
