//! HTTP routes.
//!
//! The service exposes exactly one route. Anything else falls through to the
//! router's default 404, and other methods on the route get axum's 405.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod forecast;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_FORECAST;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Path of the forecast route
pub const FORECAST_PATH: &str = "/weatherforecast";

/// Creates the Axum router with the forecast route and its middleware.
pub fn create_router(state: AppState) -> Router {
    // Forecast - never cached, every response is random
    let forecast_routes = Router::new()
        .route(FORECAST_PATH, get(forecast::weather_forecast))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_FORECAST),
        ));

    with_service_layers(Router::new().merge(forecast_routes).with_state(state))
}

/// Wraps a stateless router in the middleware shared by every route.
fn with_service_layers(router: Router) -> Router {
    router
        // Handler panics become a generic 500 instead of dropping the connection
        .layer(CatchPanicLayer::new())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn always_panics() -> &'static str {
        panic!("handler failure")
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_internal_error() {
        let app = with_service_layers(Router::new().route("/fails", get(always_panics)));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/fails").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(crate::config::REQUEST_ID_HEADER));

        // The router keeps serving after a panic
        let response = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
