use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// 积分流水，只追加；单用户 amount 求和恒等于当前余额
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PointTransaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64, // 有符号，扣减为负
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PointTransactionResponse {
    pub id: i64,
    pub amount: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl From<PointTransaction> for PointTransactionResponse {
    fn from(tx: PointTransaction) -> Self {
        Self {
            id: tx.id,
            amount: tx.amount,
            reason: tx.reason,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    pub points_balance: i64,
}
