use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use metastore_store::SharedStore;

use crate::endpoint::endpoints;
use crate::handler::{self, AppState};

/// Default request body limit, matching `ServerConfig::default()`.
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Build the axum router with all metadata endpoints.
pub fn build_router(store: SharedStore) -> Router {
    build_router_with_limit(store, DEFAULT_BODY_LIMIT)
}

pub fn build_router_with_limit(store: SharedStore, max_body_bytes: usize) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::METADATA, get(handler::list_identifiers))
        .route(
            endpoints::ENTRY,
            get(handler::get_entry)
                .post(handler::create_identifier)
                .delete(handler::delete_identifier),
        )
        .route(
            endpoints::KEY,
            get(handler::get_value)
                .put(handler::upsert_value)
                .post(handler::insert_value)
                .delete(handler::delete_key),
        )
        .route(
            endpoints::SNAPSHOT,
            get(handler::export_snapshot).put(handler::import_snapshot),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}
