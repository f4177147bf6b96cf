//! 模板库：券模板与礼品卡模板的读取、实例落库、用量递增。
//! 所有函数都对 executor 泛型，既可以直接跑在连接池上，
//! 也可以用 `&mut *tx` 参与兑换引擎的事务。

use crate::error::AppResult;
use crate::models::*;
use sqlx::Sqlite;

pub async fn coupon_template_by_code<'e, E>(
    executor: E,
    code: &str,
) -> AppResult<Option<CouponTemplate>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let template = sqlx::query_as::<_, CouponTemplate>(
        r#"
        SELECT
            id, code, title, details, discount_kind, discount_value, min_spend,
            scope_kind, scope_values, valid_from, valid_until,
            usage_limit, usage_count, is_active, created_at
        FROM coupon_templates
        WHERE code = ?
        "#,
    )
    .bind(code)
    .fetch_optional(executor)
    .await?;

    Ok(template)
}

pub async fn coupon_template_by_id<'e, E>(
    executor: E,
    id: i64,
) -> AppResult<Option<CouponTemplate>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let template = sqlx::query_as::<_, CouponTemplate>(
        r#"
        SELECT
            id, code, title, details, discount_kind, discount_value, min_spend,
            scope_kind, scope_values, valid_from, valid_until,
            usage_limit, usage_count, is_active, created_at
        FROM coupon_templates
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(template)
}

pub async fn gift_card_template_by_id<'e, E>(
    executor: E,
    id: i64,
) -> AppResult<Option<GiftCardTemplate>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let template = sqlx::query_as::<_, GiftCardTemplate>(
        r#"
        SELECT id, name, description, image_url, is_active, created_at
        FROM gift_card_templates
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(template)
}

/// 乐观递增用量：只有 usage_count 仍等于读取时的值才会命中。
/// 返回 false 表示并发修改，调用方应整体重试。
/// 只允许在创建依赖实例的同一事务里调用。
pub async fn try_increment_usage<'e, E>(
    executor: E,
    template_id: i64,
    observed_count: i64,
) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE coupon_templates SET usage_count = usage_count + 1 WHERE id = ? AND usage_count = ?",
    )
    .bind(template_id)
    .bind(observed_count)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn insert_user_coupon<'e, E>(executor: E, record: &NewUserCoupon) -> AppResult<UserCoupon>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO user_coupons (
            user_id, template_id, code, title, discount_kind, discount_value,
            min_spend, scope_kind, scope_values, valid_from, valid_until,
            status, source, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'active', ?, ?)
        RETURNING id
        "#,
    )
    .bind(record.user_id)
    .bind(record.template_id)
    .bind(&record.code)
    .bind(&record.title)
    .bind(record.discount_kind)
    .bind(record.discount_value)
    .bind(record.min_spend)
    .bind(record.scope_kind)
    .bind(&record.scope_values)
    .bind(record.valid_from)
    .bind(record.valid_until)
    .bind(&record.source)
    .bind(record.created_at)
    .fetch_one(executor)
    .await?;

    Ok(UserCoupon {
        id,
        user_id: record.user_id,
        template_id: record.template_id,
        code: record.code.clone(),
        title: record.title.clone(),
        discount_kind: record.discount_kind,
        discount_value: record.discount_value,
        min_spend: record.min_spend,
        scope_kind: record.scope_kind,
        scope_values: record.scope_values.clone(),
        valid_from: record.valid_from,
        valid_until: record.valid_until,
        status: CouponStatus::Active,
        source: record.source.clone(),
        created_at: record.created_at,
    })
}

pub async fn insert_user_gift_card<'e, E>(
    executor: E,
    record: &NewUserGiftCard,
) -> AppResult<UserGiftCard>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO user_giftcards (
            user_id, template_id, name, description, image_url,
            status, source, created_at
        ) VALUES (?, ?, ?, ?, ?, 'active', ?, ?)
        RETURNING id
        "#,
    )
    .bind(record.user_id)
    .bind(record.template_id)
    .bind(&record.name)
    .bind(&record.description)
    .bind(&record.image_url)
    .bind(&record.source)
    .bind(record.created_at)
    .fetch_one(executor)
    .await?;

    Ok(UserGiftCard {
        id,
        user_id: record.user_id,
        template_id: record.template_id,
        name: record.name.clone(),
        description: record.description.clone(),
        image_url: record.image_url.clone(),
        status: GiftCardStatus::Active,
        source: record.source.clone(),
        created_at: record.created_at,
        redeemed_at: None,
    })
}
