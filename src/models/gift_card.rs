use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GiftCardStatus {
    Active,
    Redeemed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GiftCardTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// 用户持有的礼品卡，名称/描述/图片为发放时刻的快照
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserGiftCard {
    pub id: i64,
    pub user_id: i64,
    pub template_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub status: GiftCardStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewUserGiftCard {
    pub user_id: i64,
    pub template_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserGiftCardResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub status: GiftCardStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl From<UserGiftCard> for UserGiftCardResponse {
    fn from(card: UserGiftCard) -> Self {
        Self {
            id: card.id,
            name: card.name,
            description: card.description,
            image_url: card.image_url,
            status: card.status,
            source: card.source,
            created_at: card.created_at,
            redeemed_at: card.redeemed_at,
        }
    }
}
