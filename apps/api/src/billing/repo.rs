use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::billing::TransactionRow;

/// Applies the processor-reported status to the transaction record.
/// Returns the updated row, or `None` when no such reference exists.
pub async fn update_transaction_status(
    pool: &PgPool,
    tx_ref: &str,
    status: &str,
) -> Result<Option<TransactionRow>> {
    Ok(sqlx::query_as(
        r#"
        UPDATE transactions
        SET status = $1, updated_at = NOW()
        WHERE tx_ref = $2
        RETURNING *
        "#,
    )
    .bind(status)
    .bind(tx_ref)
    .fetch_optional(pool)
    .await?)
}

pub async fn activate_subscription(pool: &PgPool, user_id: Uuid) -> Result<()> {
    sqlx::query(
        "UPDATE subscriptions SET status = 'active', updated_at = NOW() WHERE user_id = $1",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Marks the subscription cancelled. Returns `false` when no subscription
/// matches the email.
pub async fn cancel_subscription_by_email(pool: &PgPool, email: &str) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE subscriptions SET status = 'cancelled', updated_at = NOW() WHERE customer_email = $1",
    )
    .bind(email)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
