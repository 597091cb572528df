use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::import::{build_document, ImportPayload};
use crate::document::schema::SectionContent;
use crate::document::store::{reduce, Action, DocumentState, Section};
use crate::document::sync::{load_document, persist_document};
use crate::errors::AppError;
use crate::models::portfolio::PortfolioRow;
use crate::portfolio::domain::{apply_domain_change, plan_domain_change};
use crate::portfolio::repo;
use crate::portfolio::slug::{check_slug_format, is_slug_unique, normalize_slug};
use crate::state::AppState;

/// POST /api/v1/portfolios/import
///
/// Builds a portfolio-with-sections document from a structured resume
/// payload and persists it as one transaction. No idempotency key: a
/// duplicate submission creates a duplicate portfolio.
pub async fn handle_import(
    State(state): State<AppState>,
    Json(payload): Json<ImportPayload>,
) -> Result<(StatusCode, Json<DocumentState>), AppError> {
    let doc = build_document(&payload)?;
    if !is_slug_unique(&state.db, &doc.slug, None).await? {
        return Err(AppError::Conflict(format!(
            "Slug '{}' is already taken",
            doc.slug
        )));
    }
    persist_document(&state.db, &doc).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /api/v1/portfolios/:id
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentState>, AppError> {
    let doc = load_document(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {id} not found")))?;
    Ok(Json(doc))
}

#[derive(Deserialize)]
pub struct UpdateSectionRequest {
    pub content: SectionContent,
}

/// PUT /api/v1/portfolios/:id/sections/:section_id
///
/// Whole-value section replace, persisted immediately. The stored document
/// is overwritten wholesale; the later of two racing saves wins.
pub async fn handle_replace_section(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
    Json(req): Json<UpdateSectionRequest>,
) -> Result<Json<Section>, AppError> {
    let doc = load_document(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {id} not found")))?;
    let section = doc
        .section(&section_id)
        .ok_or_else(|| AppError::NotFound(format!("Section '{section_id}' not found")))?;
    if !req.content.matches(section.kind) {
        return Err(AppError::Validation(format!(
            "Content shape does not match section '{section_id}'"
        )));
    }

    let doc = reduce(
        doc,
        Action::UpdateSection {
            id: section_id.clone(),
            content: req.content,
        },
    );
    persist_document(&state.db, &doc).await?;

    let section = doc
        .section(&section_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Section '{section_id}' not found")))?;
    Ok(Json(section))
}

/// POST /api/v1/portfolios/:id/sections/:section_id/reset
///
/// Restores the section's content to its schema-declared default.
pub async fn handle_reset_section(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
) -> Result<Json<Section>, AppError> {
    let doc = load_document(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {id} not found")))?;
    if doc.section(&section_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Section '{section_id}' not found"
        )));
    }

    let doc = reduce(
        doc,
        Action::ResetSection {
            id: section_id.clone(),
        },
    );
    persist_document(&state.db, &doc).await?;

    let section = doc
        .section(&section_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Section '{section_id}' not found")))?;
    Ok(Json(section))
}

#[derive(Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

/// PATCH /api/v1/portfolios/:id/sections/:section_id/visibility
///
/// Hides or shows a section. Hidden sections stay in storage; they are
/// only excluded from the published render.
pub async fn handle_set_visibility(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
    Json(req): Json<VisibilityRequest>,
) -> Result<Json<Section>, AppError> {
    let doc = load_document(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {id} not found")))?;
    if doc.section(&section_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Section '{section_id}' not found"
        )));
    }

    let doc = reduce(
        doc,
        Action::SetSectionVisibility {
            id: section_id.clone(),
            visible: req.visible,
        },
    );
    persist_document(&state.db, &doc).await?;

    let section = doc
        .section(&section_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Section '{section_id}' not found")))?;
    Ok(Json(section))
}

#[derive(Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

/// POST /api/v1/portfolios/:id/publish
pub async fn handle_publish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<PortfolioRow>, AppError> {
    let portfolio = repo::get_portfolio(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {id} not found")))?;
    repo::set_published(&state.db, id, req.published).await?;
    Ok(Json(PortfolioRow {
        published: req.published,
        ..portfolio
    }))
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub slug: String,
    pub custom_domain: Option<String>,
    pub published: bool,
    /// Visible sections only, in document order.
    pub sections: Vec<Section>,
}

/// GET /api/v1/portfolios/:id/preview
///
/// The published-render input: hidden sections are filtered out here but
/// remain in storage and in the editor view.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, AppError> {
    let doc = load_document(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {id} not found")))?;
    Ok(Json(PreviewResponse {
        slug: doc.slug.clone(),
        custom_domain: doc.custom_domain.clone(),
        published: doc.published,
        sections: doc.visible_sections().cloned().collect(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugValidateRequest {
    pub slug: String,
    pub exclude_id: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugValidateResponse {
    pub is_unique: bool,
    pub message: String,
}

/// POST /api/v1/slug/validate
///
/// The candidate is normalized before the format check and the uniqueness
/// query, so "My Blog" is judged as "my-blog".
pub async fn handle_validate_slug(
    State(state): State<AppState>,
    Json(req): Json<SlugValidateRequest>,
) -> Result<Json<SlugValidateResponse>, AppError> {
    let slug = normalize_slug(&req.slug);
    if let Err(message) = check_slug_format(&slug) {
        return Ok(Json(SlugValidateResponse {
            is_unique: false,
            message,
        }));
    }
    let is_unique = is_slug_unique(&state.db, &slug, req.exclude_id).await?;
    let message = if is_unique {
        "Slug is available".to_string()
    } else {
        "This slug is already taken".to_string()
    };
    Ok(Json(SlugValidateResponse { is_unique, message }))
}

#[derive(Deserialize)]
pub struct DomainUpdateRequest {
    /// `None` detaches the current custom domain.
    pub domain: Option<String>,
}

/// PUT /api/v1/portfolios/:id/domain
///
/// Attach/detach sequence: add the new domain at the provider, then remove
/// the old one, then update the database row. A failure between the two
/// provider calls surfaces as an upstream error without touching the row.
pub async fn handle_update_domain(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DomainUpdateRequest>,
) -> Result<Json<PortfolioRow>, AppError> {
    let domain = match req.domain {
        Some(d) => {
            let d = d.trim().to_ascii_lowercase();
            if d.is_empty() || !d.contains('.') || d.contains(char::is_whitespace) {
                return Err(AppError::Validation(format!("Invalid domain '{d}'")));
            }
            Some(d)
        }
        None => None,
    };

    let portfolio = repo::get_portfolio(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio {id} not found")))?;

    let change = plan_domain_change(portfolio.custom_domain.as_deref(), domain.as_deref());
    if !change.is_noop() {
        apply_domain_change(state.domains.as_ref(), &change)
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        repo::set_custom_domain(&state.db, id, domain.as_deref()).await?;
    }

    Ok(Json(PortfolioRow {
        custom_domain: domain,
        ..portfolio
    }))
}
