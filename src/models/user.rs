use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// 积分账本直接挂在用户记录上（points_balance 非负由 CHECK 约束兜底）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub points_balance: i64,
    pub created_at: DateTime<Utc>,
}
