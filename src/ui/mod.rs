//! Web UI module
//!
//! Serves the landing and session pages, the small JSON API, and the
//! per-session websocket over which the browser acts as both view and
//! capture platform.

pub mod bridge;
pub mod handlers;
pub mod server;
pub mod websocket;

pub use server::WebServer;
