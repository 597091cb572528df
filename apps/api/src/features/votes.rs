//! Feature-request voting: one vote per user per feature request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::feature::{FeatureRequestRow, FeatureVoteRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct VoteRequest {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct VoteResponse {
    pub vote: FeatureVoteRow,
    pub votes: i64,
}

/// One vote per user per feature request: a repeat vote is a conflict.
pub fn check_first_vote(already_voted: bool) -> Result<(), AppError> {
    if already_voted {
        Err(AppError::Conflict(
            "You have already voted for this feature".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// POST /api/v1/features/:id/vote
///
/// A second vote from the same user is a conflict; a first vote returns
/// the created vote and the new count.
pub async fn handle_vote(
    State(state): State<AppState>,
    Path(feature_id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), AppError> {
    let feature: Option<FeatureRequestRow> =
        sqlx::query_as("SELECT * FROM feature_requests WHERE id = $1")
            .bind(feature_id)
            .fetch_optional(&state.db)
            .await?;
    if feature.is_none() {
        return Err(AppError::NotFound(format!(
            "Feature request {feature_id} not found"
        )));
    }

    let existing: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM feature_votes WHERE feature_id = $1 AND user_id = $2 LIMIT 1",
    )
    .bind(feature_id)
    .bind(req.user_id)
    .fetch_optional(&state.db)
    .await?;
    check_first_vote(existing.is_some())?;

    let vote: FeatureVoteRow = sqlx::query_as(
        r#"
        INSERT INTO feature_votes (id, feature_id, user_id, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(feature_id)
    .bind(req.user_id)
    .fetch_one(&state.db)
    .await?;

    let votes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feature_votes WHERE feature_id = $1")
        .bind(feature_id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(VoteResponse { vote, votes })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_vote_by_same_user_is_a_conflict() {
        match check_first_vote(true) {
            Err(AppError::Conflict(msg)) => {
                assert_eq!(msg, "You have already voted for this feature")
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_first_vote_is_allowed() {
        assert!(check_first_vote(false).is_ok());
    }
}
