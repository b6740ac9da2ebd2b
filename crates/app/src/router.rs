use axum::routing::{get, post};
use axum::Router;

use crate::routes;
use crate::state::AppState;

/// Full route table. Wildcard segments carry the ambiguous
/// geo/category/slug remainder that the resolver disambiguates.
#[tracing::instrument(skip_all)]
pub fn app_router(state: AppState) -> Router {
    Router::new()
        // AI-friendly projections
        .route("/ai/blog/{*path}", get(routes::blog_summary))
        .route("/ai/services/{*path}", get(routes::services_summary))
        .route("/ai/faq/blog/{*path}", get(routes::blog_faq))
        .route("/ai/faq/services/{*path}", get(routes::services_faq))
        .route("/ai/schema/blog/{*path}", get(routes::blog_schema))
        .route("/ai/schema/services/{*path}", get(routes::services_schema))
        .route("/ai/stories", get(routes::stories_feed))
        // catalog
        .route("/categories", get(routes::categories))
        .route("/categories/{slug}", get(routes::category))
        .route("/geo/countries", get(routes::countries))
        .route("/geo/countries/{country}/states", get(routes::states))
        .route("/geo/countries/{country}/cities", get(routes::cities))
        // search, stories, leads
        .route("/search", get(routes::search))
        .route("/stories", get(routes::stories))
        .route("/story/generate", post(routes::generate_story))
        .route("/story/{slug}", get(routes::story))
        .route("/leads", post(routes::submit_lead))
        .with_state(state)
}
