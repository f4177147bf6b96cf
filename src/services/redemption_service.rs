//! 兑换引擎：按码领券、积分兑换奖励、到店核销礼品卡。
//! 前两个操作是对模板库 + 积分账本的乐观事务：
//! 事务内读取、校验、守卫写入，守卫落空则整体重试，重试用尽抛 CONFLICT。

use crate::database::{DbPool, MAX_TX_RETRIES, backoff, is_retryable};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{issuer, ledger_service, template_service};
use chrono::{Duration, Utc};

/// 奖励兑换产生的券固定 90 天有效，与模板自身的窗口无关
const REWARD_COUPON_VALIDITY_DAYS: i64 = 90;

#[derive(Clone)]
pub struct RedemptionService {
    pool: DbPool,
}

impl RedemptionService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // ---- 按码领券 ----

    pub async fn claim_by_code(&self, user_id: i64, code: &str) -> AppResult<UserCouponResponse> {
        let mut attempt = 0u32;
        loop {
            match self.try_claim(user_id, code).await {
                Err(e) if is_retryable(&e) && attempt + 1 < MAX_TX_RETRIES => {
                    attempt += 1;
                    log::debug!("claim_by_code conflict, retrying (attempt {attempt}): {e}");
                    backoff(attempt).await;
                }
                result => return result,
            }
        }
    }

    async fn try_claim(&self, user_id: i64, code: &str) -> AppResult<UserCouponResponse> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // 事务内重读模板，拿到一致快照
        let template = template_service::coupon_template_by_code(&mut *tx, code)
            .await?
            .ok_or(AppError::CodeNotFound)?;

        if !template.is_active {
            return Err(AppError::CouponInactive);
        }
        if now < template.valid_from {
            return Err(AppError::CouponNotYetValid);
        }
        if now > template.valid_until {
            return Err(AppError::CouponExpired);
        }
        if template.usage_limit != USAGE_UNLIMITED && template.usage_count >= template.usage_limit {
            return Err(AppError::UsageLimitReached);
        }

        // 不查同一用户是否领过：同一个码允许重复领取，见 DESIGN.md
        let record = issuer::issue_coupon(user_id, &template, None, SOURCE_CODE_CLAIM, now);
        let coupon = template_service::insert_user_coupon(&mut *tx, &record).await?;

        // 用量守卫就是本事务的提交校验：落空说明有并发领取先提交了
        if !template_service::try_increment_usage(&mut *tx, template.id, template.usage_count)
            .await?
        {
            tx.rollback().await?;
            return Err(AppError::TransientConflict);
        }

        tx.commit().await?;
        Ok(coupon.into())
    }

    // ---- 积分兑换奖励 ----

    pub async fn redeem_reward(
        &self,
        user_id: i64,
        reward_id: i64,
    ) -> AppResult<RedeemRewardResponse> {
        let mut attempt = 0u32;
        loop {
            match self.try_redeem_reward(user_id, reward_id).await {
                Err(e) if is_retryable(&e) && attempt + 1 < MAX_TX_RETRIES => {
                    attempt += 1;
                    log::debug!("redeem_reward conflict, retrying (attempt {attempt}): {e}");
                    backoff(attempt).await;
                }
                result => return result,
            }
        }
    }

    async fn try_redeem_reward(
        &self,
        user_id: i64,
        reward_id: i64,
    ) -> AppResult<RedeemRewardResponse> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, RedemptionItem>(
            r#"
            SELECT id, title, points, theme, kind, coupon_template_id,
                   gift_card_template_id, is_active, created_at
            FROM redemption_items
            WHERE id = ? AND is_active = 1
            "#,
        )
        .bind(reward_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Reward not found".to_string()))?;

        let balance = ledger_service::balance_of(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if balance < item.points {
            return Err(AppError::InsufficientPoints);
        }

        let mut coupon = None;
        let mut gift_card = None;

        match item.kind {
            RewardKind::Coupon => {
                if let Some(template_id) = item.coupon_template_id {
                    match template_service::coupon_template_by_id(&mut *tx, template_id).await? {
                        Some(template) => {
                            // 来源记奖励标题；模板 usage_count 有意不递增，
                            // 商城发放不计入通用促销码的用量上限
                            let record = issuer::issue_coupon(
                                user_id,
                                &template,
                                Some(now + Duration::days(REWARD_COUPON_VALIDITY_DAYS)),
                                &item.title,
                                now,
                            );
                            let issued =
                                template_service::insert_user_coupon(&mut *tx, &record).await?;
                            coupon = Some(UserCouponResponse::from(issued));
                        }
                        None => {
                            log::warn!(
                                "Reward {} links to missing coupon template {}",
                                item.id,
                                template_id
                            );
                        }
                    }
                }
            }
            RewardKind::Giftcard => {
                if let Some(template_id) = item.gift_card_template_id {
                    match template_service::gift_card_template_by_id(&mut *tx, template_id).await? {
                        Some(template) => {
                            let record =
                                issuer::issue_gift_card(user_id, &template, &item.title, now);
                            let issued =
                                template_service::insert_user_gift_card(&mut *tx, &record).await?;
                            gift_card = Some(UserGiftCardResponse::from(issued));
                        }
                        None => {
                            log::warn!(
                                "Reward {} links to missing gift card template {}",
                                item.id,
                                template_id
                            );
                        }
                    }
                }
            }
        }

        // 守卫扣减 + 配对流水，扣减落空即并发冲突
        if !ledger_service::try_debit(&mut *tx, user_id, item.points, balance).await? {
            tx.rollback().await?;
            return Err(AppError::TransientConflict);
        }
        ledger_service::append_transaction(
            &mut *tx,
            user_id,
            -item.points,
            &format!("Reward redeemed: {}", item.title),
            now,
        )
        .await?;

        tx.commit().await?;

        Ok(RedeemRewardResponse {
            reward_id: item.id,
            points_spent: item.points,
            remaining_points: balance - item.points,
            coupon,
            gift_card,
        })
    }

    // ---- 到店核销礼品卡 ----

    /// 单行状态迁移，不涉及多实体事务
    pub async fn redeem_gift_card_in_store(
        &self,
        user_id: i64,
        instance_id: i64,
    ) -> AppResult<UserGiftCardResponse> {
        let now = Utc::now();

        let card = sqlx::query_as::<_, UserGiftCard>(
            r#"
            SELECT id, user_id, template_id, name, description, image_url,
                   status, source, created_at, redeemed_at
            FROM user_giftcards
            WHERE id = ?
            "#,
        )
        .bind(instance_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Gift card not found".to_string()))?;

        if card.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        if card.status != GiftCardStatus::Active {
            return Err(AppError::AlreadyRedeemed);
        }

        // 状态守卫保证并发的两次核销只有一次生效
        let result = sqlx::query(
            "UPDATE user_giftcards SET status = 'redeemed', redeemed_at = ? WHERE id = ? AND status = 'active'",
        )
        .bind(now)
        .bind(instance_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::AlreadyRedeemed);
        }

        Ok(UserGiftCardResponse {
            id: card.id,
            name: card.name,
            description: card.description,
            image_url: card.image_url,
            status: GiftCardStatus::Redeemed,
            source: card.source,
            created_at: card.created_at,
            redeemed_at: Some(now),
        })
    }

    // ---- 列表与商城目录 ----

    pub async fn list_user_coupons(
        &self,
        user_id: i64,
        query: &CouponQuery,
    ) -> AppResult<PaginatedResponse<UserCouponResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let now = Utc::now();

        // 状态筛选按有效状态算：active 需要未过窗，expired 含已过窗的 active 行
        let (filter_sql, status_bind) = match query.status.as_deref() {
            Some("active") => (" AND status = 'active' AND valid_until >= ?", true),
            Some("expired") => (
                " AND (status = 'expired' OR (status = 'active' AND valid_until < ?))",
                true,
            ),
            Some("used") => (" AND status = 'used'", false),
            _ => ("", false),
        };

        let count_sql =
            format!("SELECT COUNT(*) FROM user_coupons WHERE user_id = ?{filter_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user_id);
        if status_bind {
            count_query = count_query.bind(now);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            r#"
            SELECT id, user_id, template_id, code, title, discount_kind, discount_value,
                   min_spend, scope_kind, scope_values, valid_from, valid_until,
                   status, source, created_at
            FROM user_coupons
            WHERE user_id = ?{filter_sql}
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#
        );
        let mut list_query = sqlx::query_as::<_, UserCoupon>(&list_sql).bind(user_id);
        if status_bind {
            list_query = list_query.bind(now);
        }
        let coupons = list_query
            .bind(params.get_limit() as i64)
            .bind(params.get_offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let items: Vec<UserCouponResponse> =
            coupons.into_iter().map(UserCouponResponse::from).collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn list_user_gift_cards(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<UserGiftCardResponse>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_giftcards WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let cards = sqlx::query_as::<_, UserGiftCard>(
            r#"
            SELECT id, user_id, template_id, name, description, image_url,
                   status, source, created_at, redeemed_at
            FROM user_giftcards
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

        let items: Vec<UserGiftCardResponse> =
            cards.into_iter().map(UserGiftCardResponse::from).collect();

        Ok(PaginatedResponse::new(items, params, total))
    }

    pub async fn list_rewards(&self) -> AppResult<Vec<RedemptionItemResponse>> {
        let items = sqlx::query_as::<_, RedemptionItem>(
            r#"
            SELECT id, title, points, theme, kind, coupon_template_id,
                   gift_card_template_id, is_active, created_at
            FROM redemption_items
            WHERE is_active = 1
            ORDER BY points ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items.into_iter().map(RedemptionItemResponse::from).collect())
    }

    // ---- 生命周期维护 ----

    /// 把有效期已过的 active 券批量迁移为 expired；返回迁移行数。
    /// 由 main 里的后台任务周期调用。
    pub async fn expire_lapsed_coupons(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_coupons SET status = 'expired' WHERE status = 'active' AND valid_until < ?",
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
