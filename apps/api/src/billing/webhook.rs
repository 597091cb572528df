//! Inbound payment-processor webhook.
//!
//! The processor signs each delivery by echoing a shared secret in the
//! `verif-hash` header. A missing or mismatching header is rejected with
//! 401 regardless of payload. Authenticated deliveries are always
//! acknowledged promptly; processing failures are logged, not returned, so
//! the processor does not retry into the same failure.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};
use subtle::ConstantTimeEq;
use tracing::{error, info};

use crate::billing::repo;
use crate::errors::AppError;
use crate::state::AppState;

/// Header carrying the shared webhook secret.
pub const SIGNATURE_HEADER: &str = "verif-hash";

/// Constant-time comparison of the provided header value against the
/// configured secret.
pub fn verify_signature(provided: Option<&str>, secret: &str) -> bool {
    match provided {
        Some(value) => value.as_bytes().ct_eq(secret.as_bytes()).into(),
        None => false,
    }
}

/// Extracts the customer email from a cancellation event, or `None` when
/// the payload is not a deactivated-subscription cancellation.
pub fn cancellation_email(payload: &Value) -> Option<&str> {
    if payload.get("event")?.as_str()? != "subscription.cancelled" {
        return None;
    }
    let data = payload.get("data")?;
    if data.get("status")?.as_str()? != "deactivated" {
        return None;
    }
    data.get("customer")?.get("email")?.as_str()
}

/// POST /api/v1/payments/webhook
///
/// Takes the raw body bytes so the signature is checked before any
/// parsing: a bad signature is 401 even when the payload is not UTF-8 or
/// not valid JSON.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    if !verify_signature(provided, &state.config.payment_webhook_secret) {
        return Err(AppError::Unauthorized);
    }

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid webhook payload: {e}")))?;

    if let Some(email) = cancellation_email(&payload) {
        match repo::cancel_subscription_by_email(&state.db, email).await {
            Ok(true) => info!("Cancelled subscription for {email}"),
            Ok(false) => info!("Cancellation webhook for unknown subscription {email}"),
            // Acknowledge anyway; the failure is ours to investigate, and a
            // processor retry would hit the same error.
            Err(e) => error!("Failed to cancel subscription for {email}: {e}"),
        }
    }

    Ok(Json(json!({ "status": "received" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_match() {
        assert!(verify_signature(Some("shared-secret"), "shared-secret"));
    }

    #[test]
    fn test_signature_mismatch_and_absence() {
        assert!(!verify_signature(Some("wrong"), "shared-secret"));
        assert!(!verify_signature(Some(""), "shared-secret"));
        assert!(!verify_signature(None, "shared-secret"));
    }

    #[test]
    fn test_cancellation_email_extracted() {
        let payload = json!({
            "event": "subscription.cancelled",
            "data": {
                "status": "deactivated",
                "customer": { "email": "jane@example.com" }
            }
        });
        assert_eq!(cancellation_email(&payload), Some("jane@example.com"));
    }

    #[test]
    fn test_other_events_are_ignored() {
        let payload = json!({
            "event": "charge.completed",
            "data": {
                "status": "deactivated",
                "customer": { "email": "jane@example.com" }
            }
        });
        assert_eq!(cancellation_email(&payload), None);
    }

    #[test]
    fn test_non_deactivated_status_is_ignored() {
        let payload = json!({
            "event": "subscription.cancelled",
            "data": {
                "status": "active",
                "customer": { "email": "jane@example.com" }
            }
        });
        assert_eq!(cancellation_email(&payload), None);
    }

    #[test]
    fn test_malformed_payload_is_ignored() {
        assert_eq!(cancellation_email(&json!({})), None);
        assert_eq!(cancellation_email(&json!("subscription.cancelled")), None);
        assert_eq!(
            cancellation_email(&json!({ "event": "subscription.cancelled" })),
            None
        );
    }
}
