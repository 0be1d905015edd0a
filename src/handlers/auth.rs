use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AuthResponse),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "邮箱或密码错误"),
        (status = 403, description = "账号已被禁用或待审核"),
        (status = 404, description = "邮箱或密码错误"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "登录成功"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = AuthResponse),
        (status = 400, description = "请求参数错误"),
        (status = 409, description = "该邮箱已被注册"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "注册成功"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/verify",
    tag = "auth",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "令牌有效", body = MergedUser),
        (status = 401, description = "令牌无效")
    )
)]
pub async fn verify(
    auth_service: web::Data<AuthService>,
    request: web::Json<VerifyTokenRequest>,
) -> Result<HttpResponse> {
    match auth_service.verify_token(&request.token).await {
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
    post,
    path = "/auth/send-code",
    tag = "auth",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "验证码发送成功"),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn send_code(
    auth_service: web::Data<AuthService>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse> {
    match auth_service.send_email_code(&request.email).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "验证码已发送到您的邮箱"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/verify-code",
    tag = "auth",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "邮箱验证成功"),
        (status = 400, description = "验证码错误")
    )
)]
pub async fn verify_code(
    auth_service: web::Data<AuthService>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse> {
    match auth_service.verify_email_code(&request.email, &request.code) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "邮箱验证成功"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "登出成功")
    )
)]
pub async fn logout() -> Result<HttpResponse> {
    // 令牌不可撤销，登出由客户端丢弃令牌完成
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "已成功登出"
    })))
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/register", web::post().to(register))
            .route("/verify", web::post().to(verify))
            .route("/send-code", web::post().to(send_code))
            .route("/verify-code", web::post().to(verify_code))
            .route("/logout", web::post().to(logout)),
    );
}
