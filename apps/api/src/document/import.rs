//! Resume import — builds a portfolio-with-sections document from an
//! externally sourced structured payload (e.g. a parsed resume export).
//!
//! `build_document` is pure and fallible: a malformed payload returns a
//! validation error without constructing anything, so a failed import can
//! never leave a half-built document behind.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::document::schema::SectionContent;
use crate::document::store::{reduce, Action, DocumentState};
use crate::errors::AppError;
use crate::portfolio::slug::{check_slug_format, normalize_slug};

/// Externally sourced resume payload. List fields hold free-shape records;
/// their inner schema is owned by the editor.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportPayload {
    pub owner_id: Uuid,
    pub slug: String,
    pub basics: Option<Value>,
    pub summary: Option<String>,
    pub about: Option<String>,
    pub experience: Option<Vec<Value>>,
    pub education: Option<Vec<Value>>,
    pub skills: Option<Vec<Value>>,
    pub certifications: Option<Vec<Value>>,
    pub projects: Option<Vec<Value>>,
    pub hackathons: Option<Vec<Value>>,
}

/// Constructs a full document from an import payload.
///
/// Starts from the schema defaults and applies one whole-value section
/// update per populated field, so the result always carries the complete
/// section set regardless of how sparse the payload is.
pub fn build_document(payload: &ImportPayload) -> Result<DocumentState, AppError> {
    let slug = normalize_slug(&payload.slug);
    if let Err(message) = check_slug_format(&slug) {
        return Err(AppError::Validation(message));
    }
    if let Some(basics) = &payload.basics {
        if !basics.is_object() {
            return Err(AppError::Validation(
                "basics must be a JSON object".to_string(),
            ));
        }
    }
    for (field, records) in [
        ("experience", &payload.experience),
        ("education", &payload.education),
        ("skills", &payload.skills),
        ("certifications", &payload.certifications),
        ("projects", &payload.projects),
        ("hackathons", &payload.hackathons),
    ] {
        if let Some(records) = records {
            if records.iter().any(|r| !r.is_object()) {
                return Err(AppError::Validation(format!(
                    "every {field} entry must be a JSON object"
                )));
            }
        }
    }

    let mut doc = DocumentState::with_default_sections(Uuid::new_v4(), payload.owner_id, slug);

    let mut updates: Vec<(&str, SectionContent)> = Vec::new();
    if let Some(basics) = &payload.basics {
        updates.push(("basics", SectionContent::Records(vec![basics.clone()])));
    }
    if let Some(summary) = &payload.summary {
        updates.push(("summary", SectionContent::Prose(summary.clone())));
    }
    if let Some(about) = &payload.about {
        updates.push(("about", SectionContent::Prose(about.clone())));
    }
    for (id, records) in [
        ("experience", &payload.experience),
        ("education", &payload.education),
        ("skills", &payload.skills),
        ("certifications", &payload.certifications),
        ("projects", &payload.projects),
        ("hackathons", &payload.hackathons),
    ] {
        if let Some(records) = records {
            updates.push((id, SectionContent::Records(records.clone())));
        }
    }

    for (id, content) in updates {
        doc = reduce(
            doc,
            Action::UpdateSection {
                id: id.to_string(),
                content,
            },
        );
    }

    Ok(doc)
}
