use crate::error::AppError;
use crate::middlewares::AuthedUser;
use crate::models::*;
use crate::services::{DistributionService, NotificationService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};

fn current_user(req: &HttpRequest) -> Option<AuthedUser> {
    req.extensions().get::<AuthedUser>().cloned()
}

#[utoipa::path(
    post,
    path = "/admin/campaigns/distribute",
    tag = "campaign",
    request_body = DistributeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "分发完成（计数可能为部分成功）", body = DistributionReport),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "需要员工权限"),
        (status = 404, description = "发放模板不存在")
    )
)]
pub async fn distribute(
    distribution_service: web::Data<DistributionService>,
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    request: web::Json<DistributeRequest>,
) -> Result<HttpResponse> {
    // 活动触发需要提升权限
    let Some(user) = current_user(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    if !user.is_elevated() {
        return Ok(AppError::Forbidden.error_response());
    }

    match distribution_service.run_campaign(&request).await {
        Ok(report) => {
            // 通知员工是尽力而为的旁路效果，失败不影响响应
            notification_service
                .notify_staff(
                    "Campaign distribution finished",
                    &format!("{} instances issued", report.distributed_count),
                )
                .await;

            if !report.fully_succeeded() {
                log::warn!(
                    "Campaign partially failed: {} chunks reported errors",
                    report.failed_chunks.len()
                );
            }

            Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn campaign_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/campaigns").route("/distribute", web::post().to(distribute)),
    );
}
