use actix_web::{HttpResponse, Result as ActixResult};

use crate::errors::DriveError;
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::services::error_response;
use crate::utils::validate::{validate_email, validate_password_simple};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    create_request: CreateUserRequest,
) -> ActixResult<HttpResponse> {
    let email = create_request.email.trim().to_lowercase();

    // 1. 验证邮箱
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    // 2. 验证密码策略
    if let Err(msg) = validate_password_simple(&create_request.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    // 3. 检查邮箱是否已存在
    match service.storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, ErrorCode::RegisterFailed)),
    }

    // 4. 哈希密码
    let password_hash = match service.credentials.hash(&create_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Register failed",
                )),
            );
        }
    };

    // 5. 创建用户（并发注册同一邮箱时由唯一约束兜底）
    match service.storage.create_user(&email, &password_hash).await {
        Ok(user) => {
            tracing::info!("User {} registered", user.email);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Register successful")))
        }
        Err(e @ DriveError::Conflict(_)) => {
            Ok(error_response(&e, ErrorCode::UserEmailAlreadyExists))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::RegisterFailed)),
    }
}
