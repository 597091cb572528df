use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::portfolio::PortfolioRow;

pub async fn get_portfolio(pool: &PgPool, id: Uuid) -> Result<Option<PortfolioRow>> {
    Ok(sqlx::query_as("SELECT * FROM portfolios WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn set_published(pool: &PgPool, id: Uuid, published: bool) -> Result<()> {
    sqlx::query("UPDATE portfolios SET published = $1, updated_at = NOW() WHERE id = $2")
        .bind(published)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Written only after the provider calls for a domain change have both
/// succeeded.
pub async fn set_custom_domain(pool: &PgPool, id: Uuid, domain: Option<&str>) -> Result<()> {
    sqlx::query("UPDATE portfolios SET custom_domain = $1, updated_at = NOW() WHERE id = $2")
        .bind(domain)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
