pub mod catalog;
pub mod error;
pub mod media;
pub mod path_codec;
pub mod range;
pub mod state;

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use crate::http::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let catalog_api = Router::new()
        .route("/api/channels", get(catalog::list_channels).post(catalog::add_channel))
        .route("/api/channels/{id}", delete(catalog::delete_channel))
        .route("/api/channels/{id}/episodes", get(catalog::channel_episodes))
        .route("/api/seasons", get(catalog::list_seasons).post(catalog::add_season))
        .route("/api/seasons/{id}", delete(catalog::delete_season))
        .route("/api/seasons/{id}/episodes", post(catalog::add_season_episodes))
        .route(
            "/api/shows",
            get(catalog::list_shows)
                .post(catalog::add_show)
                .layer(DefaultBodyLimit::max(catalog::MAX_SHOW_UPLOAD)),
        )
        .layer(CorsLayer::permissive());

    // Answers preflights and tags error responses; 200/206 carry their own
    // expose list, so none is configured here.
    let video_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers([header::RANGE]);
    let video_api = Router::new()
        .route(
            "/api/video/{*path}",
            get(media::serve_video_get).head(media::serve_video_head),
        )
        .layer(video_cors);

    Router::new()
        .merge(video_api)
        .merge(catalog_api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the browser frontend for every unmatched route, falling back to
/// `index.html` so client-side routes survive a reload.
pub fn with_frontend(router: Router, dir: &Path) -> Router {
    if !dir.is_dir() {
        tracing::warn!("Frontend directory not found, serving API only: {}", dir.display());
        return router;
    }
    tracing::info!("Serving frontend from {}", dir.display());
    router.fallback_service(
        ServeDir::new(dir)
            .append_index_html_on_directories(true)
            .not_found_service(ServeFile::new(dir.join("index.html"))),
    )
}
