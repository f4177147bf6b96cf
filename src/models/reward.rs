use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::coupon::UserCouponResponse;
use super::gift_card::UserGiftCardResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Coupon,
    Giftcard,
}

/// 积分商城条目：恰好关联一个与 kind 匹配的模板
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RedemptionItem {
    pub id: i64,
    pub title: String,
    pub points: i64,
    pub theme: String,
    pub kind: RewardKind,
    pub coupon_template_id: Option<i64>,
    pub gift_card_template_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedemptionItemResponse {
    pub id: i64,
    pub title: String,
    pub points: i64,
    pub theme: String,
    pub kind: RewardKind,
}

impl From<RedemptionItem> for RedemptionItemResponse {
    fn from(item: RedemptionItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            points: item.points,
            theme: item.theme,
            kind: item.kind,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemRewardResponse {
    pub reward_id: i64,
    pub points_spent: i64,
    pub remaining_points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<UserCouponResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_card: Option<UserGiftCardResponse>,
}
