//! forecast-api: a single-route HTTP service returning a random weather forecast.
//!
//! The library exposes the router and its building blocks so the binary and
//! the integration tests share one wiring.

pub mod config;
pub mod forecast;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{AppConfig, Environment};
pub use forecast::{ForecastGenerator, ForecastRecord};
pub use routes::create_router;
pub use state::AppState;
