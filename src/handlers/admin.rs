use crate::services::UserService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取全部记录成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_all(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    match user_service.dump().await {
        Ok((auth_records, profile_records)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "auth_users": auth_records,
                "users": profile_records
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已清空全部记录"),
        (status = 401, description = "未授权")
    )
)]
pub async fn reset(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    match user_service.reset().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "已清除所有记录"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(list_all))
            .route("/reset", web::post().to(reset)),
    );
}
