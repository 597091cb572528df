//! Custom-domain attach/detach against the external hosting provider.
//!
//! The provider sequence is: add the new domain first, then remove the old
//! one if it changed. There is no compensating rollback — a failure after
//! the first call leaves a dangling record at the provider, which is logged
//! before the error is surfaced. The database row is written only after
//! both calls succeed.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

/// Seam over the hosting provider's domain API. Swappable for tests and
/// for provider migrations.
#[async_trait]
pub trait DomainProvider: Send + Sync {
    async fn add_domain(&self, domain: &str) -> Result<()>;
    async fn remove_domain(&self, domain: &str) -> Result<()>;
}

/// HTTP client for the hosting provider's domain API.
pub struct HttpDomainProvider {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpDomainProvider {
    pub fn new(base_url: String, token: String) -> HttpDomainProvider {
        HttpDomainProvider {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }
}

#[async_trait]
impl DomainProvider for HttpDomainProvider {
    async fn add_domain(&self, domain: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/domains", self.base_url))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "name": domain }))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("provider rejected domain add ({status}): {body}");
        }
        info!("Attached domain {domain} at provider");
        Ok(())
    }

    async fn remove_domain(&self, domain: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/domains/{domain}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("provider rejected domain removal ({status}): {body}");
        }
        info!("Detached domain {domain} at provider");
        Ok(())
    }
}

/// The provider calls a domain update requires, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainChange {
    pub add: Option<String>,
    pub remove: Option<String>,
}

impl DomainChange {
    pub fn is_noop(&self) -> bool {
        self.add.is_none() && self.remove.is_none()
    }
}

/// Plans the provider calls for moving a portfolio from `old` to `new`.
/// An unchanged domain plans nothing.
pub fn plan_domain_change(old: Option<&str>, new: Option<&str>) -> DomainChange {
    if old == new {
        return DomainChange {
            add: None,
            remove: None,
        };
    }
    DomainChange {
        add: new.map(str::to_string),
        remove: old.map(str::to_string),
    }
}

/// Executes a planned change: add first, then remove. A removal failure
/// after a successful add is logged as a provider inconsistency before
/// propagating.
pub async fn apply_domain_change(provider: &dyn DomainProvider, change: &DomainChange) -> Result<()> {
    if let Some(domain) = &change.add {
        provider.add_domain(domain).await?;
    }
    if let Some(domain) = &change.remove {
        if let Err(e) = provider.remove_domain(domain).await {
            if let Some(added) = &change.add {
                warn!(
                    "Domain {added} was attached but {domain} could not be detached; \
                     provider state is now inconsistent with the database"
                );
            }
            return Err(e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProvider {
        calls: Mutex<Vec<String>>,
        fail_remove: bool,
    }

    #[async_trait]
    impl DomainProvider for RecordingProvider {
        async fn add_domain(&self, domain: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("add:{domain}"));
            Ok(())
        }

        async fn remove_domain(&self, domain: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("remove:{domain}"));
            if self.fail_remove {
                anyhow::bail!("provider unavailable");
            }
            Ok(())
        }
    }

    #[test]
    fn test_unchanged_domain_plans_nothing() {
        assert!(plan_domain_change(Some("a.com"), Some("a.com")).is_noop());
        assert!(plan_domain_change(None, None).is_noop());
    }

    #[test]
    fn test_change_plans_add_and_remove() {
        let change = plan_domain_change(Some("old.com"), Some("new.com"));
        assert_eq!(change.add.as_deref(), Some("new.com"));
        assert_eq!(change.remove.as_deref(), Some("old.com"));
    }

    #[test]
    fn test_detach_only_plans_remove() {
        let change = plan_domain_change(Some("old.com"), None);
        assert_eq!(change.add, None);
        assert_eq!(change.remove.as_deref(), Some("old.com"));
    }

    #[tokio::test]
    async fn test_apply_adds_before_removing() {
        let provider = RecordingProvider::default();
        let change = plan_domain_change(Some("old.com"), Some("new.com"));
        apply_domain_change(&provider, &change).await.unwrap();
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec!["add:new.com".to_string(), "remove:old.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mid_sequence_failure_propagates() {
        let provider = RecordingProvider {
            fail_remove: true,
            ..Default::default()
        };
        let change = plan_domain_change(Some("old.com"), Some("new.com"));
        let result = apply_domain_change(&provider, &change).await;
        assert!(result.is_err());
        // The add already happened; the caller must not write the database.
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec!["add:new.com".to_string(), "remove:old.com".to_string()]
        );
    }
}
