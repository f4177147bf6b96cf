use crate::middlewares::AuthedUser;
use crate::models::*;
use crate::services::LedgerService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};

fn current_user(req: &HttpRequest) -> Option<AuthedUser> {
    req.extensions().get::<AuthedUser>().cloned()
}

#[utoipa::path(
    get,
    path = "/wallet",
    tag = "wallet",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取积分余额成功", body = WalletResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_wallet(
    ledger_service: web::Data<LedgerService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user(&req).map(|u| u.id).unwrap_or(0);

    match ledger_service.get_wallet(user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wallet/transactions",
    tag = "wallet",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取积分流水成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_wallet_transactions(
    ledger_service: web::Data<LedgerService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = current_user(&req).map(|u| u.id).unwrap_or(0);

    match ledger_service.get_transactions(user_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn wallet_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wallet")
            .route("", web::get().to(get_wallet))
            .route("/transactions", web::get().to(get_wallet_transactions)),
    );
}
