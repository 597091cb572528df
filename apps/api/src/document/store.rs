//! Document Store — the in-memory normalized representation of one
//! portfolio document and its pure transition function.
//!
//! The store is a plain value transformed by `reduce(state, action)`.
//! Actions are total: an unknown section id leaves the state unchanged and
//! never raises. Section updates replace the content whole-value; name and
//! visibility are untouched by an update.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::schema::{default_content, SectionContent, SectionKind};

/// One named, independently addressable slice of a portfolio document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique within the document.
    pub id: String,
    pub kind: SectionKind,
    pub name: String,
    /// Hidden sections are retained in state and storage but excluded from
    /// the published render.
    pub visible: bool,
    pub content: SectionContent,
}

impl Section {
    pub fn with_default_content(kind: SectionKind) -> Section {
        Section {
            id: kind.as_str().to_string(),
            kind,
            name: kind.display_name().to_string(),
            visible: true,
            content: default_content(kind),
        }
    }
}

/// The aggregate root: one portfolio document owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub slug: String,
    pub published: bool,
    pub custom_domain: Option<String>,
    /// Ordered; section ids are unique within the document.
    pub sections: Vec<Section>,
}

impl DocumentState {
    /// Hydrates a fresh document with one default section per kind, in
    /// canonical order.
    pub fn with_default_sections(id: Uuid, owner_id: Uuid, slug: String) -> DocumentState {
        DocumentState {
            id,
            owner_id,
            slug,
            published: false,
            custom_domain: None,
            sections: SectionKind::ALL
                .iter()
                .map(|k| Section::with_default_content(*k))
                .collect(),
        }
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Sections included in the published render. Hidden sections are
    /// filtered out here but remain in `sections`.
    pub fn visible_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.visible)
    }
}

/// Named mutations of the document. Each addresses exactly one section and
/// replaces its target attribute whole-value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    UpdateSection {
        id: String,
        content: SectionContent,
    },
    ResetSection {
        id: String,
    },
    SetSectionVisibility {
        id: String,
        visible: bool,
    },
}

/// The transition function. Pure and total: any action on any state yields
/// a state, and actions on distinct section ids commute.
pub fn reduce(state: DocumentState, action: Action) -> DocumentState {
    let mut state = state;
    match action {
        Action::UpdateSection { id, content } => {
            if let Some(section) = state.sections.iter_mut().find(|s| s.id == id) {
                section.content = content;
            }
        }
        Action::ResetSection { id } => {
            if let Some(section) = state.sections.iter_mut().find(|s| s.id == id) {
                section.content = default_content(section.kind);
            }
        }
        Action::SetSectionVisibility { id, visible } => {
            if let Some(section) = state.sections.iter_mut().find(|s| s.id == id) {
                section.visible = visible;
            }
        }
    }
    state
}

/// Status of one asynchronous operation layered on top of the store.
/// Each operation tracks its own flag; flags are orthogonal to the
/// document value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Owned, mutable-by-replacement store for one editing session.
///
/// Single-writer discipline: the session owns the store and is the only
/// mutator. The document accessor returns an explicit absent result when
/// nothing has been hydrated yet.
#[derive(Debug, Default)]
pub struct SessionStore {
    document: Option<DocumentState>,
    import_status: OpStatus,
    save_status: OpStatus,
}

impl SessionStore {
    pub fn new() -> SessionStore {
        SessionStore::default()
    }

    pub fn document(&self) -> Option<&DocumentState> {
        self.document.as_ref()
    }

    pub fn import_status(&self) -> OpStatus {
        self.import_status
    }

    pub fn save_status(&self) -> OpStatus {
        self.save_status
    }

    /// Loads a document into the store, replacing any previous value.
    pub fn hydrate(&mut self, document: DocumentState) {
        self.document = Some(document);
    }

    /// Applies an action through the transition function. A dispatch with
    /// no hydrated document is a no-op.
    pub fn dispatch(&mut self, action: Action) {
        if let Some(doc) = self.document.take() {
            self.document = Some(reduce(doc, action));
        }
    }

    /// Marks an import in flight. The caller is responsible for not
    /// double-invoking; this only tracks status.
    pub fn begin_import(&mut self) {
        self.import_status = OpStatus::Pending;
    }

    /// Resolves an in-flight import. On success the created document
    /// replaces the store; on failure the store is left exactly as it was.
    pub fn finish_import(&mut self, result: Result<DocumentState, ()>) {
        match result {
            Ok(document) => {
                self.document = Some(document);
                self.import_status = OpStatus::Succeeded;
            }
            Err(()) => {
                self.import_status = OpStatus::Failed;
            }
        }
    }

    pub fn begin_save(&mut self) {
        self.save_status = OpStatus::Pending;
    }

    pub fn finish_save(&mut self, ok: bool) {
        self.save_status = if ok {
            OpStatus::Succeeded
        } else {
            OpStatus::Failed
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> DocumentState {
        DocumentState::with_default_sections(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "jane-doe".to_string(),
        )
    }

    #[test]
    fn test_default_sections_are_unique_and_ordered() {
        let d = doc();
        assert_eq!(d.sections.len(), SectionKind::ALL.len());
        for (section, kind) in d.sections.iter().zip(SectionKind::ALL) {
            assert_eq!(section.kind, kind);
        }
        let mut ids: Vec<_> = d.sections.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SectionKind::ALL.len());
    }

    #[test]
    fn test_update_replaces_content_whole_value() {
        let d = reduce(
            doc(),
            Action::UpdateSection {
                id: "summary".to_string(),
                content: SectionContent::Prose("Senior engineer.".to_string()),
            },
        );
        let summary = d.section("summary").unwrap();
        assert_eq!(
            summary.content,
            SectionContent::Prose("Senior engineer.".to_string())
        );
        // Name and visibility are untouched by an update.
        assert_eq!(summary.name, "Summary");
        assert!(summary.visible);
    }

    #[test]
    fn test_updates_on_distinct_sections_commute() {
        let a = Action::UpdateSection {
            id: "summary".to_string(),
            content: SectionContent::Prose("A summary.".to_string()),
        };
        let b = Action::UpdateSection {
            id: "skills".to_string(),
            content: SectionContent::Records(vec![json!({ "name": "Rust" })]),
        };

        let ab = reduce(reduce(doc(), a.clone()), b.clone());
        let ba = reduce(reduce(doc(), b), a);
        assert_eq!(ab.sections, ba.sections);
    }

    #[test]
    fn test_reset_restores_schema_default() {
        let edited = reduce(
            doc(),
            Action::UpdateSection {
                id: "experience".to_string(),
                content: SectionContent::Records(vec![json!({ "company": "Acme" })]),
            },
        );
        let restored = reduce(
            edited,
            Action::ResetSection {
                id: "experience".to_string(),
            },
        );
        assert_eq!(
            restored.section("experience").unwrap().content,
            default_content(SectionKind::Experience)
        );
    }

    #[test]
    fn test_unknown_section_id_is_a_noop() {
        let before = doc();
        let after = reduce(
            before.clone(),
            Action::UpdateSection {
                id: "awards".to_string(),
                content: SectionContent::Prose("x".to_string()),
            },
        );
        assert_eq!(before.sections, after.sections);
    }

    #[test]
    fn test_hidden_section_retained_but_excluded_from_render() {
        let d = reduce(
            doc(),
            Action::SetSectionVisibility {
                id: "hackathons".to_string(),
                visible: false,
            },
        );
        assert!(d.section("hackathons").is_some());
        assert!(d.visible_sections().all(|s| s.id != "hackathons"));
    }

    #[test]
    fn test_session_store_starts_absent_and_idle() {
        let store = SessionStore::new();
        assert!(store.document().is_none());
        assert_eq!(store.import_status(), OpStatus::Idle);
        assert_eq!(store.save_status(), OpStatus::Idle);
    }

    #[test]
    fn test_failed_import_leaves_store_untouched() {
        let mut store = SessionStore::new();
        let original = doc();
        store.hydrate(original.clone());

        store.begin_import();
        assert_eq!(store.import_status(), OpStatus::Pending);
        // Prior state is untouched while the import is in flight.
        assert_eq!(store.document(), Some(&original));

        store.finish_import(Err(()));
        assert_eq!(store.import_status(), OpStatus::Failed);
        assert_eq!(store.document(), Some(&original));
    }

    #[test]
    fn test_successful_import_replaces_document() {
        let mut store = SessionStore::new();
        store.hydrate(doc());

        let imported = doc();
        store.begin_import();
        store.finish_import(Ok(imported.clone()));
        assert_eq!(store.import_status(), OpStatus::Succeeded);
        assert_eq!(store.document(), Some(&imported));
    }

    #[test]
    fn test_status_resets_to_pending_on_next_invocation() {
        let mut store = SessionStore::new();
        store.begin_save();
        store.finish_save(false);
        assert_eq!(store.save_status(), OpStatus::Failed);

        store.begin_save();
        assert_eq!(store.save_status(), OpStatus::Pending);
    }
}
