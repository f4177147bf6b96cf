pub mod distribution_service;
pub mod issuer;
pub mod ledger_service;
pub mod notification_service;
pub mod redemption_service;
pub mod segment_service;
pub mod template_service;

pub use distribution_service::{DistributionService, GrantTemplate, MAX_BATCH_WRITES};
pub use ledger_service::LedgerService;
pub use notification_service::NotificationService;
pub use redemption_service::RedemptionService;
pub use segment_service::SegmentService;
