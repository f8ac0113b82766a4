use std::sync::Arc;

use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/routes", get(handlers::routes::list_routes))
        .route("/api/routes/title", get(handlers::routes::route_title))
        .route(
            "/api/session",
            get(handlers::session::current)
                .post(handlers::session::sign_in)
                .delete(handlers::session::sign_out),
        )
        .route("/api/session/events", get(handlers::session::events_stream))
        .route(
            "/api/beneficiaries",
            get(handlers::beneficiaries::list).post(handlers::beneficiaries::add),
        )
        .route(
            "/api/beneficiaries/:upi",
            delete(handlers::beneficiaries::remove),
        )
        .route(
            "/api/support/tickets",
            get(handlers::support::list_tickets).post(handlers::support::submit_ticket),
        )
        .route("/api/support/faq", get(handlers::support::help))
        .route(
            "/api/settings/profile",
            get(handlers::settings::get_profile).put(handlers::settings::update_profile),
        )
        .route(
            "/api/settings/account",
            delete(handlers::settings::delete_account),
        )
        .route("/api/statement", get(handlers::statement::get_statement))
        .route(
            "/api/statement/export",
            get(handlers::statement::export_statement),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
