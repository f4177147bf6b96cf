//! 员工推送：查出 staff/admin/designer 的设备令牌并尝试推送。
//! 尽力而为的旁路效果，任何失败只记日志，绝不影响主操作。

use crate::database::DbPool;
use crate::error::AppResult;
use crate::external::PushGateway;

#[derive(Clone)]
pub struct NotificationService {
    pool: DbPool,
    push: PushGateway,
}

impl NotificationService {
    pub fn new(pool: DbPool, push: PushGateway) -> Self {
        Self { pool, push }
    }

    pub async fn notify_staff(&self, title: &str, body: &str) {
        let tokens = match self.staff_device_tokens().await {
            Ok(tokens) => tokens,
            Err(e) => {
                log::warn!("Failed to load staff device tokens: {e}");
                return;
            }
        };

        for token in tokens {
            if let Err(e) = self.push.send(&token, title, body).await {
                log::warn!("Push delivery failed for one device: {e}");
            }
        }
    }

    async fn staff_device_tokens(&self) -> AppResult<Vec<String>> {
        let tokens: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT dt.token
            FROM device_tokens dt
            JOIN users u ON u.id = dt.user_id
            WHERE u.role IN ('staff', 'admin', 'designer')
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens)
    }
}
