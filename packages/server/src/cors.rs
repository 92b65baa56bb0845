use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Build the CORS policy for browser clients. `"*"` as an origin allows any
/// origin; entries that are not valid header values are skipped.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allow_origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(%origin, "Ignoring invalid CORS origin"))
                .ok()
        }))
    };

    let methods: Vec<Method> = config
        .allow_methods
        .iter()
        .filter_map(|method| {
            Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
                .inspect_err(|_| warn!(%method, "Ignoring invalid CORS method"))
                .ok()
        })
        .collect();

    let headers: Vec<HeaderName> = config
        .allow_headers
        .iter()
        .filter_map(|header| {
            HeaderName::from_bytes(header.trim().as_bytes())
                .inspect_err(|_| warn!(%header, "Ignoring invalid CORS header"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers))
        .max_age(Duration::from_secs(config.max_age))
}
