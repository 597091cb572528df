//! Slug validation — format check plus a uniqueness query that can exclude
//! the record being edited (so re-saving a portfolio under its own slug
//! stays valid).

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub const MAX_SLUG_LEN: usize = 63;

/// Checks the slug format: lowercase alphanumerics and hyphens, no leading
/// or trailing hyphen, DNS-label length limit. Returns a user-facing
/// message on failure.
pub fn check_slug_format(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug cannot be empty".to_string());
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(format!("Slug cannot be longer than {MAX_SLUG_LEN} characters"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err("Slug cannot start or end with a hyphen".to_string());
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(
            "Slug may only contain lowercase letters, digits and hyphens".to_string(),
        );
    }
    Ok(())
}

/// Derives a well-formed slug from free text. Runs of non-alphanumeric
/// characters collapse into a single hyphen.
pub fn normalize_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// True when an existing portfolio holding the slug blocks it, i.e. it is
/// not the record being edited.
pub fn blocks_slug(existing_id: Uuid, exclude_id: Option<Uuid>) -> bool {
    exclude_id != Some(existing_id)
}

/// True when no other portfolio already uses `slug`. `exclude_id` skips the
/// record being edited, so re-saving under the same slug stays valid.
pub async fn is_slug_unique(pool: &PgPool, slug: &str, exclude_id: Option<Uuid>) -> Result<bool> {
    let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM portfolios WHERE slug = $1")
        .bind(slug)
        .fetch_all(pool)
        .await?;
    Ok(!ids.into_iter().any(|id| blocks_slug(id, exclude_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs_pass() {
        for slug in ["jane", "jane-doe", "jane-doe-2", "a1b2"] {
            assert!(check_slug_format(slug).is_ok(), "{slug} should be valid");
        }
    }

    #[test]
    fn test_invalid_slugs_fail_with_message() {
        for slug in ["", "Jane", "jane doe", "-jane", "jane-", "jane_doe"] {
            let err = check_slug_format(slug).unwrap_err();
            assert!(!err.is_empty(), "{slug} should be rejected with a message");
        }
    }

    #[test]
    fn test_overlong_slug_fails() {
        let slug = "a".repeat(MAX_SLUG_LEN + 1);
        assert!(check_slug_format(&slug).is_err());
    }

    #[test]
    fn test_normalize_collapses_and_lowercases() {
        assert_eq!(normalize_slug("Jane  Doe!"), "jane-doe");
        assert_eq!(normalize_slug("--My   Blog--"), "my-blog");
        assert_eq!(normalize_slug("Café Crème"), "caf-cr-me");
    }

    #[test]
    fn test_normalized_output_is_well_formed() {
        for input in ["Jane  Doe!", "  --x-- ", "HELLO_world 42"] {
            let slug = normalize_slug(input);
            assert!(check_slug_format(&slug).is_ok(), "{input:?} -> {slug:?}");
        }
    }

    #[test]
    fn test_all_symbol_input_normalizes_to_empty_and_fails_format() {
        let slug = normalize_slug("!!!");
        assert_eq!(slug, "");
        assert!(check_slug_format(&slug).is_err());
    }

    #[test]
    fn test_existing_slug_blocks_without_exclusion() {
        let existing = Uuid::new_v4();
        assert!(blocks_slug(existing, None));
        assert!(blocks_slug(existing, Some(Uuid::new_v4())));
    }

    #[test]
    fn test_own_record_does_not_block_revalidation() {
        let existing = Uuid::new_v4();
        assert!(!blocks_slug(existing, Some(existing)));
    }
}
