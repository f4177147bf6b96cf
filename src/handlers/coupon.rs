use crate::middlewares::AuthedUser;
use crate::models::*;
use crate::services::RedemptionService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};

fn current_user(req: &HttpRequest) -> Option<AuthedUser> {
    req.extensions().get::<AuthedUser>().cloned()
}

#[utoipa::path(
    get,
    path = "/coupons",
    tag = "coupon",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("status" = Option<String>, Query, description = "状态: active/used/expired")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取券列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_coupons(
    redemption_service: web::Data<RedemptionService>,
    req: HttpRequest,
    query: web::Query<CouponQuery>,
) -> Result<HttpResponse> {
    let user_id = current_user(&req).map(|u| u.id).unwrap_or(0);

    match redemption_service.list_user_coupons(user_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/coupons/claim",
    tag = "coupon",
    request_body = ClaimCouponRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "领取成功", body = UserCouponResponse),
        (status = 400, description = "券不可用/已过期/已领完"),
        (status = 404, description = "兑换码不存在"),
        (status = 409, description = "并发冲突，稍后重试")
    )
)]
pub async fn claim_coupon(
    redemption_service: web::Data<RedemptionService>,
    req: HttpRequest,
    request: web::Json<ClaimCouponRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user(&req).map(|u| u.id).unwrap_or(0);

    let code = request.code.trim();
    if code.is_empty() {
        return Ok(
            crate::error::AppError::ValidationError("Coupon code is required".to_string())
                .error_response(),
        );
    }

    match redemption_service.claim_by_code(user_id, code).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn coupon_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/coupons")
            .route("", web::get().to(get_coupons))
            .route("/claim", web::post().to(claim_coupon)),
    );
}
