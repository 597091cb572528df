pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::billing;
use crate::features::votes;
use crate::portfolio::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Portfolio API
        .route("/api/v1/portfolios/import", post(handlers::handle_import))
        .route("/api/v1/portfolios/:id", get(handlers::handle_get_portfolio))
        .route(
            "/api/v1/portfolios/:id/sections/:section_id",
            put(handlers::handle_replace_section),
        )
        .route(
            "/api/v1/portfolios/:id/sections/:section_id/reset",
            post(handlers::handle_reset_section),
        )
        .route(
            "/api/v1/portfolios/:id/sections/:section_id/visibility",
            patch(handlers::handle_set_visibility),
        )
        .route(
            "/api/v1/portfolios/:id/publish",
            post(handlers::handle_publish),
        )
        .route(
            "/api/v1/portfolios/:id/preview",
            get(handlers::handle_preview),
        )
        .route(
            "/api/v1/portfolios/:id/domain",
            put(handlers::handle_update_domain),
        )
        .route("/api/v1/slug/validate", post(handlers::handle_validate_slug))
        // Billing API
        .route(
            "/api/v1/payments/callback",
            post(billing::callback::handle_payment_callback),
        )
        .route(
            "/api/v1/payments/webhook",
            post(billing::webhook::handle_webhook),
        )
        // Feature requests
        .route("/api/v1/features/:id/vote", post(votes::handle_vote))
        .with_state(state)
}
