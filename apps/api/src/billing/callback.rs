//! Payment callback — the processor redirects here after checkout with a
//! transaction reference and final status.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::billing::repo;
use crate::errors::AppError;
use crate::state::AppState;

/// Status values the processor reports for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Successful,
    Failed,
    Pending,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "successful" => Some(PaymentStatus::Successful),
            "failed" => Some(PaymentStatus::Failed),
            "pending" => Some(PaymentStatus::Pending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Successful => "successful",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Pending => "pending",
        }
    }
}

/// Raw callback body. Both fields are required; they are optional here so
/// the handler can report the missing-field case itself instead of letting
/// deserialization reject the request opaquely.
#[derive(Debug, Deserialize)]
pub struct PaymentCallback {
    pub tx_ref: Option<String>,
    pub status: Option<String>,
}

/// Validates the callback body into a transaction reference and status.
pub fn parse_callback(body: &PaymentCallback) -> Result<(String, PaymentStatus), AppError> {
    let (Some(tx_ref), Some(status)) = (&body.tx_ref, &body.status) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };
    if tx_ref.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    let status = PaymentStatus::parse(status)
        .ok_or_else(|| AppError::Validation(format!("Unknown payment status '{status}'")))?;
    Ok((tx_ref.clone(), status))
}

/// POST /api/v1/payments/callback
///
/// Applies the reported status to the transaction record and, on a
/// successful payment, activates the subscription. The two writes are
/// independent; a failure of the second leaves the first in place and
/// surfaces the error instead of faking full success.
pub async fn handle_payment_callback(
    State(state): State<AppState>,
    Json(body): Json<PaymentCallback>,
) -> Result<Json<Value>, AppError> {
    let (tx_ref, status) = parse_callback(&body)?;

    let transaction = repo::update_transaction_status(&state.db, &tx_ref, status.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction '{tx_ref}' not found")))?;

    if status == PaymentStatus::Successful {
        repo::activate_subscription(&state.db, transaction.user_id).await?;
        info!(
            "Activated subscription for user {} (tx_ref {tx_ref})",
            transaction.user_id
        );
    }

    Ok(Json(json!({ "success": true, "transaction": transaction })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_rejected() {
        let body = PaymentCallback {
            tx_ref: None,
            status: Some("successful".to_string()),
        };
        match parse_callback(&body) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Missing required fields"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let body = PaymentCallback {
            tx_ref: Some("tx-1".to_string()),
            status: None,
        };
        assert!(matches!(
            parse_callback(&body),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let body = PaymentCallback {
            tx_ref: Some("tx-1".to_string()),
            status: Some("refunded".to_string()),
        };
        assert!(matches!(
            parse_callback(&body),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_valid_callback_parses() {
        for (raw, expected) in [
            ("successful", PaymentStatus::Successful),
            ("failed", PaymentStatus::Failed),
            ("pending", PaymentStatus::Pending),
        ] {
            let body = PaymentCallback {
                tx_ref: Some("tx-1".to_string()),
                status: Some(raw.to_string()),
            };
            let (tx_ref, status) = parse_callback(&body).unwrap();
            assert_eq!(tx_ref, "tx-1");
            assert_eq!(status, expected);
            assert_eq!(status.as_str(), raw);
        }
    }
}
