use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slug: String,
    pub published: bool,
    pub custom_domain: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionRow {
    pub portfolio_id: Uuid,
    pub section_id: String,
    pub kind: String,
    pub name: String,
    pub visible: bool,
    pub content: Value,
    pub position: i32,
}
