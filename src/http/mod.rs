//! HTTP server module.
//!
//! Binds the configured address and serves the router until a shutdown signal
//! arrives. SIGTERM/SIGINT trigger a graceful shutdown with connection draining.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
