use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    // 业务规则错误：作为操作的最终结果原样返回，不重试
    #[error("Coupon code not found")]
    CodeNotFound,

    #[error("Coupon is not active")]
    CouponInactive,

    #[error("Coupon is not valid yet")]
    CouponNotYetValid,

    #[error("Coupon has expired")]
    CouponExpired,

    #[error("Coupon usage limit reached")]
    UsageLimitReached,

    #[error("Insufficient points")]
    InsufficientPoints,

    #[error("Gift card already redeemed")]
    AlreadyRedeemed,

    // 乐观事务冲突，内部重试用尽后才会抛给调用方
    #[error("Concurrent update conflict, please retry")]
    TransientConflict,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    /// 错误码，同时用于 HTTP 响应体与测试断言
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) | AppError::JwtError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Forbidden => "FORBIDDEN",
            AppError::CodeNotFound => "CODE_NOT_FOUND",
            AppError::CouponInactive => "COUPON_INACTIVE",
            AppError::CouponNotYetValid => "COUPON_NOT_YET_VALID",
            AppError::CouponExpired => "COUPON_EXPIRED",
            AppError::UsageLimitReached => "USAGE_LIMIT_REACHED",
            AppError::InsufficientPoints => "INSUFFICIENT_POINTS",
            AppError::AlreadyRedeemed => "ALREADY_REDEEMED",
            AppError::TransientConflict => "CONFLICT",
            AppError::ExternalApiError(_) | AppError::ReqwestError(_) => "EXTERNAL_API_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
            AppError::InternalError(_) | AppError::SerdeJsonError(_) => "INTERNAL_ERROR",
            AppError::MigrateError(_) => "MIGRATION_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;

        let (status_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (StatusCode::UNAUTHORIZED, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::CodeNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Forbidden => {
                log::warn!("Forbidden access");
                (StatusCode::FORBIDDEN, self.to_string())
            }
            AppError::CouponInactive
            | AppError::CouponNotYetValid
            | AppError::CouponExpired
            | AppError::UsageLimitReached
            | AppError::InsufficientPoints
            | AppError::AlreadyRedeemed => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::TransientConflict => {
                log::warn!("Optimistic transaction retries exhausted");
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::MigrateError(err) => {
                log::error!("Migration error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Migration error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        }))
    }
}
