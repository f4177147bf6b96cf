//! 用户积分账本：余额读取、流水查询，以及兑换事务内的守卫扣减。
//! 每次余额变动都配对写入一条 point_transactions 流水。

use crate::database::DbPool;
use crate::error::AppResult;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::Sqlite;

pub async fn balance_of<'e, E>(executor: E, user_id: i64) -> AppResult<Option<i64>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let balance: Option<i64> =
        sqlx::query_scalar("SELECT points_balance FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;

    Ok(balance)
}

/// 乐观扣减：余额必须仍等于事务内读取的值。
/// 返回 false 表示并发修改，调用方整体重试。
pub async fn try_debit<'e, E>(
    executor: E,
    user_id: i64,
    amount: i64,
    observed_balance: i64,
) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE users SET points_balance = points_balance - ? WHERE id = ? AND points_balance = ?",
    )
    .bind(amount)
    .bind(user_id)
    .bind(observed_balance)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn append_transaction<'e, E>(
    executor: E,
    user_id: i64,
    amount: i64,
    reason: &str,
    now: DateTime<Utc>,
) -> AppResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO point_transactions (user_id, amount, reason, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(amount)
    .bind(reason)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// 钱包接口用的只读服务
#[derive(Clone)]
pub struct LedgerService {
    pool: DbPool,
}

impl LedgerService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_wallet(&self, user_id: i64) -> AppResult<WalletResponse> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, role, points_balance, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound("User not found".to_string()))?;

        Ok(WalletResponse {
            points_balance: user.points_balance,
        })
    }

    pub async fn get_transactions(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<PointTransactionResponse>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM point_transactions WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let transactions = sqlx::query_as::<_, PointTransaction>(
            r#"
            SELECT id, user_id, amount, reason, created_at
            FROM point_transactions
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(params.get_limit() as i64)
        .bind(params.get_offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items: Vec<PointTransactionResponse> = transactions
            .into_iter()
            .map(PointTransactionResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, params, total))
    }
}
