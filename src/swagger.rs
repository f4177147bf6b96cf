use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::coupon::get_coupons,
        handlers::coupon::claim_coupon,
        handlers::gift_card::get_gift_cards,
        handlers::gift_card::redeem_gift_card,
        handlers::reward::get_rewards,
        handlers::reward::redeem_reward,
        handlers::wallet::get_wallet,
        handlers::wallet::get_wallet_transactions,
        handlers::campaign::distribute,
    ),
    components(
        schemas(
            ApiError,
            DiscountKind,
            ScopeKind,
            CouponStatus,
            CouponTemplate,
            UserCoupon,
            UserCouponResponse,
            ClaimCouponRequest,
            CouponQuery,
            GiftCardStatus,
            GiftCardTemplate,
            UserGiftCard,
            UserGiftCardResponse,
            RewardKind,
            RedemptionItem,
            RedemptionItemResponse,
            RedeemRewardResponse,
            PointTransaction,
            PointTransactionResponse,
            WalletResponse,
            DistributionTarget,
            DistributeRequest,
            ChunkFailure,
            DistributionReport,
            PaginationParams,
            PaginationInfo,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "coupon", description = "Coupon API"),
        (name = "gift_card", description = "Gift card API"),
        (name = "reward", description = "Reward catalog API"),
        (name = "wallet", description = "Point wallet API"),
        (name = "campaign", description = "Campaign distribution API"),
    ),
    info(
        title = "Lumi Backend API",
        version = "1.0.0",
        description = "Loyalty and promotions REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
