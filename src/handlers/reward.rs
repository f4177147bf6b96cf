use crate::middlewares::AuthedUser;
use crate::models::*;
use crate::services::RedemptionService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};

fn current_user(req: &HttpRequest) -> Option<AuthedUser> {
    req.extensions().get::<AuthedUser>().cloned()
}

#[utoipa::path(
    get,
    path = "/rewards",
    tag = "reward",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取积分商城目录成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_rewards(
    redemption_service: web::Data<RedemptionService>,
) -> Result<HttpResponse> {
    match redemption_service.list_rewards().await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/rewards/{id}/redeem",
    tag = "reward",
    params(
        ("id" = i64, Path, description = "奖励条目ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "兑换成功", body = RedeemRewardResponse),
        (status = 400, description = "积分不足"),
        (status = 404, description = "奖励不存在"),
        (status = 409, description = "并发冲突，稍后重试")
    )
)]
pub async fn redeem_reward(
    redemption_service: web::Data<RedemptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = current_user(&req).map(|u| u.id).unwrap_or(0);
    let reward_id = path.into_inner();

    match redemption_service.redeem_reward(user_id, reward_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn reward_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rewards")
            .route("", web::get().to(get_rewards))
            .route("/{id}/redeem", web::post().to(redeem_reward)),
    );
}
