//! Section schema — the fixed taxonomy of portfolio sections and their
//! schema-declared defaults.
//!
//! Prose kinds (Summary, About) carry a rich-text string; every other kind
//! carries an ordered list of JSON records whose inner shape is owned by the
//! editor, not validated here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The semantic kind of a portfolio section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Basics,
    Summary,
    About,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Hackathons,
}

impl SectionKind {
    /// Canonical document order. Also the default section id set for a
    /// freshly hydrated document.
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Basics,
        SectionKind::Summary,
        SectionKind::About,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Certifications,
        SectionKind::Projects,
        SectionKind::Hackathons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Basics => "basics",
            SectionKind::Summary => "summary",
            SectionKind::About => "about",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Certifications => "certifications",
            SectionKind::Projects => "projects",
            SectionKind::Hackathons => "hackathons",
        }
    }

    pub fn from_str(s: &str) -> Option<SectionKind> {
        SectionKind::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Human-readable display name shown in the editor and published render.
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionKind::Basics => "Basics",
            SectionKind::Summary => "Summary",
            SectionKind::About => "About",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Certifications => "Certifications",
            SectionKind::Projects => "Projects",
            SectionKind::Hackathons => "Hackathons",
        }
    }

    /// Prose kinds hold a single rich-text string instead of a record list.
    pub fn is_prose(&self) -> bool {
        matches!(self, SectionKind::Summary | SectionKind::About)
    }
}

/// Content of one section. Whole-value replaced on every update; there are
/// no patch semantics at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Prose(String),
    Records(Vec<Value>),
}

impl SectionContent {
    /// True when the content's shape matches the section kind.
    pub fn matches(&self, kind: SectionKind) -> bool {
        match self {
            SectionContent::Prose(_) => kind.is_prose(),
            SectionContent::Records(_) => !kind.is_prose(),
        }
    }
}

/// Schema default for a section kind: empty prose for prose kinds, an empty
/// record list otherwise.
pub fn default_content(kind: SectionKind) -> SectionContent {
    if kind.is_prose() {
        SectionContent::Prose(String::new())
    } else {
        SectionContent::Records(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_kind_str_is_none() {
        assert_eq!(SectionKind::from_str("awards"), None);
    }

    #[test]
    fn test_prose_kinds() {
        assert!(SectionKind::Summary.is_prose());
        assert!(SectionKind::About.is_prose());
        assert!(!SectionKind::Experience.is_prose());
        assert!(!SectionKind::Basics.is_prose());
    }

    #[test]
    fn test_default_content_matches_kind() {
        for kind in SectionKind::ALL {
            assert!(default_content(kind).matches(kind));
        }
    }

    #[test]
    fn test_content_deserializes_untagged() {
        let prose: SectionContent = serde_json::from_value(json!("Led the team")).unwrap();
        assert_eq!(prose, SectionContent::Prose("Led the team".to_string()));

        let records: SectionContent =
            serde_json::from_value(json!([{ "company": "Acme" }])).unwrap();
        assert_eq!(
            records,
            SectionContent::Records(vec![json!({ "company": "Acme" })])
        );
    }
}
