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
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::verify,
        handlers::auth::send_code,
        handlers::auth::verify_code,
        handlers::auth::logout,
        handlers::user::get_profile,
        handlers::user::get_active_users,
        handlers::admin::list_all,
        handlers::admin::reset,
    ),
    components(
        schemas(
            AuthRecord,
            ProfileRecord,
            MergedUser,
            AccountStatus,
            Nationality,
            LoginRequest,
            RegisterRequest,
            VerifyTokenRequest,
            SendCodeRequest,
            VerifyCodeRequest,
            AuthResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User profile API"),
        (name = "admin", description = "Mock data administration API"),
    ),
    info(
        title = "Waren Backend API",
        version = "1.0.0",
        description = "和恋 (Waren) mock identity REST API documentation",
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
