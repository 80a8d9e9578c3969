pub mod api;
pub mod config;
pub mod error;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use fyyur_db::AppState;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Builds the full router. CORS is left to the caller so tests can run
/// without an origin list.
pub fn app(state: Arc<AppState>) -> Router {
    let venues = Router::new()
        .route("/", get(api::venues::list_venues))
        .route("/search", post(api::venues::search_venues))
        .route(
            "/create",
            get(api::venues::create_venue_form).post(api::venues::create_venue_submission),
        )
        .route(
            "/{id}",
            get(api::venues::show_venue).delete(api::venues::delete_venue),
        )
        .route(
            "/{id}/edit",
            get(api::venues::edit_venue).post(api::venues::edit_venue_submission),
        );

    let artists = Router::new()
        .route("/", get(api::artists::list_artists))
        .route("/search", post(api::artists::search_artists))
        .route(
            "/create",
            get(api::artists::create_artist_form).post(api::artists::create_artist_submission),
        )
        .route("/{id}", get(api::artists::show_artist))
        .route(
            "/{id}/edit",
            get(api::artists::edit_artist).post(api::artists::edit_artist_submission),
        );

    let shows = Router::new()
        .route("/", get(api::shows::list_shows))
        .route(
            "/create",
            get(api::shows::create_show_form).post(api::shows::create_show_submission),
        );

    Router::new()
        .route("/", get(api::index))
        .route("/healthz", get(api::healthz))
        .nest("/venues", venues)
        .nest("/artists", artists)
        .nest("/shows", shows)
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}
