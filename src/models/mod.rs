pub mod campaign;
pub mod common;
pub mod coupon;
pub mod gift_card;
pub mod pagination;
pub mod reward;
pub mod user;
pub mod wallet;

pub use campaign::*;
pub use common::*;
pub use coupon::*;
pub use gift_card::*;
pub use pagination::*;
pub use reward::*;
pub use user::*;
pub use wallet::*;
