//! 圈人：把声明式的分发目标解析成用户 ID 集合。
//! 出现 all 直接短路返回全量；否则各规则取并集，结果与规则顺序无关。

use crate::database::DbPool;
use crate::error::AppResult;
use crate::models::DistributionTarget;
use chrono::{Duration, Utc};
use std::collections::HashSet;

/// new 规则的回溯窗口
const NEW_USER_WINDOW_DAYS: i64 = 7;

#[derive(Clone)]
pub struct SegmentService {
    pool: DbPool,
}

impl SegmentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn resolve(&self, targets: &[DistributionTarget]) -> AppResult<HashSet<i64>> {
        // all 短路：其余规则全部冗余
        if targets
            .iter()
            .any(|t| matches!(t, DistributionTarget::All))
        {
            return self.all_user_ids().await;
        }

        let mut ids = HashSet::new();

        for target in targets {
            match target {
                DistributionTarget::All => unreachable!("handled by short-circuit above"),
                DistributionTarget::New => {
                    let cutoff = Utc::now() - Duration::days(NEW_USER_WINDOW_DAYS);
                    let rows: Vec<i64> =
                        sqlx::query_scalar("SELECT id FROM users WHERE created_at >= ?")
                            .bind(cutoff)
                            .fetch_all(&self.pool)
                            .await?;
                    ids.extend(rows);
                }
                DistributionTarget::Role { roles } => {
                    if roles.is_empty() {
                        continue;
                    }
                    let placeholders = vec!["?"; roles.len()].join(", ");
                    let sql = format!("SELECT id FROM users WHERE role IN ({placeholders})");
                    let mut query = sqlx::query_scalar::<_, i64>(&sql);
                    for role in roles {
                        query = query.bind(role);
                    }
                    let rows = query.fetch_all(&self.pool).await?;
                    ids.extend(rows);
                }
                DistributionTarget::Specific { user_ids } => {
                    ids.extend(user_ids.iter().copied());
                }
                DistributionTarget::Pass { pass_name } => {
                    let rows: Vec<i64> = sqlx::query_scalar(
                        "SELECT user_id FROM user_passes WHERE pass_name = ? AND is_active = 1",
                    )
                    .bind(pass_name)
                    .fetch_all(&self.pool)
                    .await?;
                    ids.extend(rows);
                }
            }
        }

        Ok(ids)
    }

    async fn all_user_ids(&self) -> AppResult<HashSet<i64>> {
        let rows: Vec<i64> = sqlx::query_scalar("SELECT id FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}
