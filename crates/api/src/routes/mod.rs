pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /slides/{id}/brief            generate visual brief (POST)
/// /slides/{id}/prompts          build image prompt variants (POST)
/// /slides/{id}/variations       generate candidate images (POST)
/// /slides/{id}/rank             rank and select (POST)
/// /downloads                    assemble ZIP download (POST, auth)
/// /brands/{id}/style-analysis   derive brand style guide (POST, auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/slides/{id}/brief", post(handlers::slides::generate_brief))
        .route("/slides/{id}/prompts", post(handlers::slides::build_prompts))
        .route(
            "/slides/{id}/variations",
            post(handlers::slides::generate_variations),
        )
        .route("/slides/{id}/rank", post(handlers::slides::rank_slide))
        .route("/downloads", post(handlers::downloads::create_download))
        .route(
            "/brands/{id}/style-analysis",
            post(handlers::brands::analyze_style),
        )
}
