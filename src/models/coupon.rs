use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// code_claim / campaign 两种固定来源；奖励兑换的来源是奖励标题本身
pub const SOURCE_CODE_CLAIM: &str = "code_claim";
pub const SOURCE_CAMPAIGN: &str = "campaign";

/// 模板无使用上限时 usage_limit 的取值
pub const USAGE_UNLIMITED: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Fixed,      // 固定金额(美分)
    Percentage, // 百分比折扣
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    All,
    Categories,
    Services,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Active,
    Used,
    Expired,
}

impl std::fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouponStatus::Active => write!(f, "active"),
            CouponStatus::Used => write!(f, "used"),
            CouponStatus::Expired => write!(f, "expired"),
        }
    }
}

/// 管理端维护的共享券模板；usage_count 只允许领取事务递增
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CouponTemplate {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub details: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub min_spend: i64,
    pub scope_kind: ScopeKind,
    pub scope_values: Option<String>, // JSON 数组快照列
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: i64, // -1 = 不限量
    pub usage_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// 用户持有的券实例，折扣条款是发放时刻的快照，之后模板变更不回溯
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserCoupon {
    pub id: i64,
    pub user_id: i64,
    pub template_id: i64,
    pub code: String,
    pub title: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub min_spend: i64,
    pub scope_kind: ScopeKind,
    pub scope_values: Option<String>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub status: CouponStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl UserCoupon {
    /// 读取侧的有效状态：行仍是 active 但有效期已过时按 expired 报告
    pub fn effective_status(&self, now: DateTime<Utc>) -> CouponStatus {
        if self.status == CouponStatus::Active && now > self.valid_until {
            CouponStatus::Expired
        } else {
            self.status
        }
    }
}

/// 发放器产出的待写入记录，由调用方在事务内落库
#[derive(Debug, Clone)]
pub struct NewUserCoupon {
    pub user_id: i64,
    pub template_id: i64,
    pub code: String,
    pub title: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub min_spend: i64,
    pub scope_kind: ScopeKind,
    pub scope_values: Option<String>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserCouponResponse {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub min_spend: i64,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub status: CouponStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserCoupon> for UserCouponResponse {
    fn from(coupon: UserCoupon) -> Self {
        let status = coupon.effective_status(Utc::now());
        Self {
            id: coupon.id,
            code: coupon.code,
            title: coupon.title,
            discount_kind: coupon.discount_kind,
            discount_value: coupon.discount_value,
            min_spend: coupon.min_spend,
            valid_from: coupon.valid_from,
            valid_until: coupon.valid_until,
            status,
            source: coupon.source,
            created_at: coupon.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CouponQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>, // active/used/expired
}
