use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::portfolio::domain::DomainProvider;

/// Shared application state injected into all route handlers via Axum
/// extractors. Dependencies are passed explicitly here; no module reaches
/// into an implicit context.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable hosting-provider client for custom-domain attach/detach.
    pub domains: Arc<dyn DomainProvider>,
}
