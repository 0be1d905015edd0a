use crate::middlewares::CurrentUserId;
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn get_user_id_from_request(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<CurrentUserId>().map(|id| id.0.clone())
}

#[utoipa::path(
    get,
    path = "/user/profile",
    tag = "user",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取用户资料成功", body = MergedUser),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or_default();

    match user_service.get_profile(&user_id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "user": user
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/user/active",
    tag = "user",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取活跃用户列表成功", body = [MergedUser]),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_active_users(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    match user_service.list_active().await {
        Ok(users) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "users": users
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/profile", web::get().to(get_profile))
            .route("/active", web::get().to(get_active_users)),
    );
}
