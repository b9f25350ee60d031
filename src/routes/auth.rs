use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::auth::requests::LoginRequest;
use crate::models::users::requests::CreateUserRequest;
use crate::services::AuthService;

pub async fn login(
    service: web::Data<AuthService>,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    service.login(user_data.into_inner()).await
}

pub async fn register(
    service: web::Data<AuthService>,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    service.register(user_data.into_inner()).await
}

pub async fn get_user(
    service: web::Data<AuthService>,
    request: HttpRequest,
) -> ActixResult<HttpResponse> {
    service.get_user(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/login", web::post().to(login))
            .route("/register", web::post().to(register))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(get_user)),
            ),
    );
}
