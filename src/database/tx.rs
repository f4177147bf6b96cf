use crate::error::AppError;
use rand::Rng;
use std::time::Duration;

/// 乐观事务的最大尝试次数，超过后把 TransientConflict 抛给调用方
pub const MAX_TX_RETRIES: u32 = 8;

/// 判断错误是否值得整体重试：
/// 显式的乐观冲突（守卫更新 0 行命中）或 SQLite 的 busy/locked
pub fn is_retryable(err: &AppError) -> bool {
    match err {
        AppError::TransientConflict => true,
        AppError::DatabaseError(sqlx::Error::Database(db)) => {
            let msg = db.message();
            msg.contains("database is locked") || msg.contains("database table is locked")
        }
        _ => false,
    }
}

/// 带抖动的退避，避免冲突的事务再次同时提交
pub async fn backoff(attempt: u32) {
    let base = 5u64 << attempt.min(5); // 5ms, 10ms, ... 封顶 160ms
    let jitter = rand::thread_rng().gen_range(0..base);
    tokio::time::sleep(Duration::from_millis(base + jitter)).await;
}
