pub mod api;
pub mod guard;

use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    middleware,
    response::Html,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

const PLACEHOLDER_PAGE: &str = "<!doctype html><html><head><title>Juno Dashboard</title></head>\
<body><p>Juno Dashboard API is running. Configure <code>ui.dir</code> to serve the UI.</p></body></html>";

async fn placeholder() -> Html<&'static str> {
    Html(PLACEHOLDER_PAGE)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors
        .iter()
        .flat_map(|c| c.allowed_origins.iter())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Credentialed requests need explicit origins.
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
            .allow_credentials(true)
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state);
    let state = Arc::new(state);

    let router = Router::new().nest("/api", api::build_api_routes(state.clone()));

    // Page routes: the UI bundle when configured, otherwise a stub page.
    let router = match &state.config.ui {
        Some(ui) => {
            let index = std::path::Path::new(&ui.dir).join("index.html");
            router.fallback_service(ServeDir::new(&ui.dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(placeholder),
    };

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
