//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::{AppConfig, ConfigError, Environment};
use crate::forecast::ForecastGenerator;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything here is immutable after startup, so concurrent requests need
/// no coordination.
#[derive(Clone)]
pub struct AppState {
    pub environment: Environment,
    pub forecast: Arc<ForecastGenerator>,
}

impl AppState {
    /// Creates the state from a loaded configuration and the active profile.
    ///
    /// Fails if the forecast settings cannot produce a forecast, so a bad
    /// configuration is rejected at startup rather than on every request.
    pub fn new(config: &AppConfig, environment: Environment) -> Result<Self, ConfigError> {
        let forecast = ForecastGenerator::new(config.forecast.clone())?;
        Ok(Self {
            environment,
            forecast: Arc::new(forecast),
        })
    }
}
