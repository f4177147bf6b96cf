pub mod campaign;
pub mod coupon;
pub mod gift_card;
pub mod reward;
pub mod wallet;

pub use campaign::campaign_config;
pub use coupon::coupon_config;
pub use gift_card::gift_card_config;
pub use reward::reward_config;
pub use wallet::wallet_config;
