//! Persistence Sync — one-directional push of an in-memory document to
//! Postgres.
//!
//! The persisted copy is an external replica overwritten wholesale on every
//! save: the portfolio row is upserted and the section rows are deleted and
//! re-inserted inside one transaction. There is no merge, no conflict
//! detection, and no read-back reconciliation beyond re-fetch on next load.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::document::schema::SectionKind;
use crate::document::store::{DocumentState, Section};
use crate::models::portfolio::{PortfolioRow, SectionRow};

/// Writes the full document in one transaction. Used both by the import
/// path (first write) and by every subsequent save.
pub async fn persist_document(pool: &PgPool, doc: &DocumentState) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO portfolios (id, user_id, slug, published, custom_domain, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
        ON CONFLICT (id) DO UPDATE
        SET slug = EXCLUDED.slug,
            published = EXCLUDED.published,
            custom_domain = EXCLUDED.custom_domain,
            updated_at = NOW()
        "#,
    )
    .bind(doc.id)
    .bind(doc.owner_id)
    .bind(&doc.slug)
    .bind(doc.published)
    .bind(&doc.custom_domain)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM portfolio_sections WHERE portfolio_id = $1")
        .bind(doc.id)
        .execute(&mut *tx)
        .await?;

    for (position, section) in doc.sections.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO portfolio_sections
                (portfolio_id, section_id, kind, name, visible, content, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(doc.id)
        .bind(&section.id)
        .bind(section.kind.as_str())
        .bind(&section.name)
        .bind(section.visible)
        .bind(serde_json::to_value(&section.content)?)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        "Persisted portfolio {} ({} sections) for user {}",
        doc.id,
        doc.sections.len(),
        doc.owner_id
    );
    Ok(())
}

/// Re-hydrates a document from its persisted replica. Returns `None` when
/// the portfolio does not exist.
pub async fn load_document(pool: &PgPool, portfolio_id: Uuid) -> Result<Option<DocumentState>> {
    let portfolio: Option<PortfolioRow> =
        sqlx::query_as("SELECT * FROM portfolios WHERE id = $1")
            .bind(portfolio_id)
            .fetch_optional(pool)
            .await?;
    let Some(portfolio) = portfolio else {
        return Ok(None);
    };

    let rows: Vec<SectionRow> = sqlx::query_as(
        "SELECT * FROM portfolio_sections WHERE portfolio_id = $1 ORDER BY position ASC",
    )
    .bind(portfolio_id)
    .fetch_all(pool)
    .await?;

    let mut sections = Vec::with_capacity(rows.len());
    for row in rows {
        let kind = SectionKind::from_str(&row.kind)
            .ok_or_else(|| anyhow::anyhow!("unknown section kind '{}' in storage", row.kind))?;
        sections.push(Section {
            id: row.section_id,
            kind,
            name: row.name,
            visible: row.visible,
            content: serde_json::from_value(row.content)?,
        });
    }

    Ok(Some(DocumentState {
        id: portfolio.id,
        owner_id: portfolio.user_id,
        slug: portfolio.slug,
        published: portfolio.published,
        custom_domain: portfolio.custom_domain,
        sections,
    }))
}
