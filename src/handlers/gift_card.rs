use crate::middlewares::AuthedUser;
use crate::models::*;
use crate::services::RedemptionService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};

fn current_user(req: &HttpRequest) -> Option<AuthedUser> {
    req.extensions().get::<AuthedUser>().cloned()
}

#[utoipa::path(
    get,
    path = "/gift-cards",
    tag = "gift_card",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取礼品卡列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_gift_cards(
    redemption_service: web::Data<RedemptionService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = current_user(&req).map(|u| u.id).unwrap_or(0);

    match redemption_service
        .list_user_gift_cards(user_id, &query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/gift-cards/{id}/redeem",
    tag = "gift_card",
    params(
        ("id" = i64, Path, description = "礼品卡实例ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "核销成功", body = UserGiftCardResponse),
        (status = 400, description = "已核销过"),
        (status = 403, description = "不是持卡人"),
        (status = 404, description = "礼品卡不存在")
    )
)]
pub async fn redeem_gift_card(
    redemption_service: web::Data<RedemptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = current_user(&req).map(|u| u.id).unwrap_or(0);
    let instance_id = path.into_inner();

    match redemption_service
        .redeem_gift_card_in_store(user_id, instance_id)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn gift_card_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gift-cards")
            .route("", web::get().to(get_gift_cards))
            .route("/{id}/redeem", web::post().to(redeem_gift_card)),
    );
}
