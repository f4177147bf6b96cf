mod common;

use chrono::{Duration, Utc};
use common::*;
use futures_util::future::join_all;
use lumi_backend::AppError;
use lumi_backend::models::{CouponStatus, SOURCE_CODE_CLAIM, USAGE_UNLIMITED};
use lumi_backend::services::RedemptionService;

#[tokio::test]
async fn test_claim_by_code_issues_snapshot_instance() {
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    let template_id = active_coupon_template(&pool, "WELCOME10", 100).await;
    let service = RedemptionService::new(pool.clone());

    let coupon = service.claim_by_code(user_id, "WELCOME10").await.unwrap();

    assert!(coupon.code.starts_with("WELCOME10-"));
    assert_eq!(coupon.status, CouponStatus::Active);
    assert_eq!(coupon.source, SOURCE_CODE_CLAIM);
    assert_eq!(coupon_template_usage(&pool, template_id).await, 1);
    assert_eq!(user_coupon_count(&pool, user_id).await, 1);
}

#[tokio::test]
async fn test_claim_unknown_code() {
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    let service = RedemptionService::new(pool.clone());

    let err = service.claim_by_code(user_id, "NOPE").await.unwrap_err();
    assert!(matches!(err, AppError::CodeNotFound));
}

#[tokio::test]
async fn test_claim_inactive_template() {
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    let now = Utc::now();
    seed_coupon_template(
        &pool,
        "PAUSED",
        USAGE_UNLIMITED,
        0,
        false,
        now - Duration::days(1),
        now + Duration::days(1),
    )
    .await;
    let service = RedemptionService::new(pool.clone());

    let err = service.claim_by_code(user_id, "PAUSED").await.unwrap_err();
    assert!(matches!(err, AppError::CouponInactive));
}

#[tokio::test]
async fn test_claim_outside_validity_window() {
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    let now = Utc::now();
    seed_coupon_template(
        &pool,
        "FUTURE",
        USAGE_UNLIMITED,
        0,
        true,
        now + Duration::days(1),
        now + Duration::days(10),
    )
    .await;
    seed_coupon_template(
        &pool,
        "BYGONE",
        USAGE_UNLIMITED,
        0,
        true,
        now - Duration::days(10),
        now - Duration::days(1),
    )
    .await;
    let service = RedemptionService::new(pool.clone());

    let err = service.claim_by_code(user_id, "FUTURE").await.unwrap_err();
    assert!(matches!(err, AppError::CouponNotYetValid));

    let err = service.claim_by_code(user_id, "BYGONE").await.unwrap_err();
    assert!(matches!(err, AppError::CouponExpired));
}

#[tokio::test]
async fn test_claim_at_usage_limit_creates_no_instance() {
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    let now = Utc::now();
    let template_id = seed_coupon_template(
        &pool,
        "WELCOME10",
        100,
        100,
        true,
        now - Duration::days(1),
        now + Duration::days(30),
    )
    .await;
    let service = RedemptionService::new(pool.clone());

    let err = service.claim_by_code(user_id, "WELCOME10").await.unwrap_err();

    assert!(matches!(err, AppError::UsageLimitReached));
    assert_eq!(user_coupon_count(&pool, user_id).await, 0);
    assert_eq!(coupon_template_usage(&pool, template_id).await, 100);
}

#[tokio::test]
async fn test_same_user_may_claim_twice() {
    // 按码领取不做同用户去重，这是保留下来的策略行为
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    active_coupon_template(&pool, "TWICE", 10).await;
    let service = RedemptionService::new(pool.clone());

    service.claim_by_code(user_id, "TWICE").await.unwrap();
    service.claim_by_code(user_id, "TWICE").await.unwrap();

    assert_eq!(user_coupon_count(&pool, user_id).await, 2);
}

#[tokio::test]
async fn test_concurrent_claims_never_exceed_usage_limit() {
    let (pool, _db) = setup_pool().await;
    let template_id = active_coupon_template(&pool, "SCARCE", 3).await;
    let user_ids = seed_users_bulk(&pool, 6, "customer").await;
    let service = RedemptionService::new(pool.clone());

    let handles: Vec<_> = user_ids
        .iter()
        .map(|&user_id| {
            let service = service.clone();
            tokio::spawn(async move { service.claim_by_code(user_id, "SCARCE").await })
        })
        .collect();

    let results = join_all(handles).await;
    let successes = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();

    assert_eq!(successes, 3);
    assert_eq!(coupon_template_usage(&pool, template_id).await, 3);

    let issued: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_coupons")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(issued, 3);
}

#[tokio::test]
async fn test_template_edit_does_not_touch_issued_instances() {
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    let template_id = active_coupon_template(&pool, "FROZEN", 10).await;
    let service = RedemptionService::new(pool.clone());

    let issued = service.claim_by_code(user_id, "FROZEN").await.unwrap();

    sqlx::query("UPDATE coupon_templates SET discount_value = 9999, title = 'Changed' WHERE id = ?")
        .bind(template_id)
        .execute(&pool)
        .await
        .unwrap();

    let stored: (i64, String) =
        sqlx::query_as("SELECT discount_value, title FROM user_coupons WHERE id = ?")
            .bind(issued.id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert_eq!(stored.0, 1000);
    assert_eq!(stored.1, "Promo FROZEN");
}

#[tokio::test]
async fn test_expiry_sweep_transitions_lapsed_coupons() {
    let (pool, _db) = setup_pool().await;
    let user_id = seed_user(&pool, "Ada", "customer", 0).await;
    active_coupon_template(&pool, "SHORT", 10).await;
    let service = RedemptionService::new(pool.clone());

    let issued = service.claim_by_code(user_id, "SHORT").await.unwrap();

    // 把实例的有效期改成过去，模拟时间流逝
    sqlx::query("UPDATE user_coupons SET valid_until = ? WHERE id = ?")
        .bind(Utc::now() - Duration::hours(1))
        .bind(issued.id)
        .execute(&pool)
        .await
        .unwrap();

    let swept = service.expire_lapsed_coupons().await.unwrap();
    assert_eq!(swept, 1);

    let status: String = sqlx::query_scalar("SELECT status FROM user_coupons WHERE id = ?")
        .bind(issued.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "expired");
}
