#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use lumi_backend::config::DatabaseConfig;
use lumi_backend::database::{DbPool, create_pool, run_migrations};
use tempfile::NamedTempFile;

/// 临时 SQLite 库 + 迁移。NamedTempFile 需要活到测试结束，一并返回。
pub async fn setup_pool() -> (DbPool, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_db.path().display()),
        max_connections: 5,
    };
    let pool = create_pool(&config).await.expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    (pool, temp_db)
}

pub async fn seed_user(pool: &DbPool, name: &str, role: &str, points: i64) -> i64 {
    seed_user_at(pool, name, role, points, Utc::now()).await
}

/// 建用户；初始积分同时落一条流水，保证账本求和律从一开始成立
pub async fn seed_user_at(
    pool: &DbPool,
    name: &str,
    role: &str,
    points: i64,
    created_at: DateTime<Utc>,
) -> i64 {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (name, role, points_balance, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(role)
    .bind(points)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("Failed to seed user");

    if points != 0 {
        sqlx::query(
            "INSERT INTO point_transactions (user_id, amount, reason, created_at) VALUES (?, ?, 'Signup grant', ?)",
        )
        .bind(id)
        .bind(points)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("Failed to seed signup transaction");
    }

    id
}

pub async fn seed_coupon_template(
    pool: &DbPool,
    code: &str,
    usage_limit: i64,
    usage_count: i64,
    is_active: bool,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO coupon_templates (
            code, title, details, discount_kind, discount_value, min_spend,
            scope_kind, scope_values, valid_from, valid_until,
            usage_limit, usage_count, is_active, created_at
        ) VALUES (?, ?, '', 'fixed', 1000, 0, 'all', NULL, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(code)
    .bind(format!("Promo {code}"))
    .bind(valid_from)
    .bind(valid_until)
    .bind(usage_limit)
    .bind(usage_count)
    .bind(is_active)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .expect("Failed to seed coupon template")
}

/// 当前有效、指定用量上限的模板
pub async fn active_coupon_template(pool: &DbPool, code: &str, usage_limit: i64) -> i64 {
    let now = Utc::now();
    seed_coupon_template(
        pool,
        code,
        usage_limit,
        0,
        true,
        now - Duration::days(1),
        now + Duration::days(30),
    )
    .await
}

pub async fn seed_gift_card_template(pool: &DbPool, name: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO gift_card_templates (name, description, image_url, is_active, created_at)
        VALUES (?, 'A treat on us', NULL, 1, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .expect("Failed to seed gift card template")
}

pub async fn seed_coupon_reward(
    pool: &DbPool,
    title: &str,
    points: i64,
    coupon_template_id: i64,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO redemption_items (title, points, theme, kind, coupon_template_id, gift_card_template_id, is_active, created_at)
        VALUES (?, ?, 'default', 'coupon', ?, NULL, 1, ?)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(points)
    .bind(coupon_template_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .expect("Failed to seed coupon reward")
}

pub async fn seed_gift_card_reward(
    pool: &DbPool,
    title: &str,
    points: i64,
    gift_card_template_id: i64,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO redemption_items (title, points, theme, kind, coupon_template_id, gift_card_template_id, is_active, created_at)
        VALUES (?, ?, 'default', 'giftcard', NULL, ?, 1, ?)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(points)
    .bind(gift_card_template_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .expect("Failed to seed gift card reward")
}

pub async fn seed_pass(pool: &DbPool, user_id: i64, pass_name: &str, is_active: bool) {
    sqlx::query(
        "INSERT INTO user_passes (user_id, pass_name, is_active, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(pass_name)
    .bind(is_active)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("Failed to seed pass");
}

pub async fn seed_users_bulk(pool: &DbPool, count: usize, role: &str) -> Vec<i64> {
    let now = Utc::now();
    let mut ids = Vec::with_capacity(count);
    let mut tx = pool.begin().await.expect("Failed to begin seed tx");
    for i in 0..count {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, role, points_balance, created_at) VALUES (?, ?, 0, ?) RETURNING id",
        )
        .bind(format!("user-{i}"))
        .bind(role)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .expect("Failed to seed user");
        ids.push(id);
    }
    tx.commit().await.expect("Failed to commit seed tx");
    ids
}

pub async fn coupon_template_usage(pool: &DbPool, template_id: i64) -> i64 {
    sqlx::query_scalar("SELECT usage_count FROM coupon_templates WHERE id = ?")
        .bind(template_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read usage count")
}

pub async fn user_coupon_count(pool: &DbPool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM user_coupons WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count user coupons")
}

pub async fn points_balance(pool: &DbPool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT points_balance FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

pub async fn transaction_sum(pool: &DbPool, user_id: i64) -> i64 {
    sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM point_transactions WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .expect("Failed to sum transactions")
}
