pub mod auth;
pub mod dashboard;
pub mod files;
pub mod folders;
pub mod sharing;

pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use files::FileService;
pub use folders::FolderService;
pub use sharing::SharingService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};

use crate::errors::DriveError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 领域错误对应的 HTTP 状态码
pub(crate) fn status_for(err: &DriveError) -> StatusCode {
    match err {
        DriveError::NotFound(_) => StatusCode::NOT_FOUND,
        DriveError::Forbidden(_) => StatusCode::FORBIDDEN,
        DriveError::Conflict(_) => StatusCode::CONFLICT,
        DriveError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DriveError::LinkExpired(_) => StatusCode::GONE,
        DriveError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DriveError::Authentication(_) => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 没有更具体业务码时使用的默认错误码
pub(crate) fn default_code(err: &DriveError) -> ErrorCode {
    match err {
        DriveError::NotFound(_) => ErrorCode::NotFound,
        DriveError::Forbidden(_) => ErrorCode::Forbidden,
        DriveError::Conflict(_) => ErrorCode::Conflict,
        DriveError::InvalidInput(_) => ErrorCode::BadRequest,
        DriveError::LinkExpired(_) => ErrorCode::ShareLinkExpired,
        DriveError::StoreUnavailable(_) => ErrorCode::ServiceUnavailable,
        DriveError::Authentication(_) => ErrorCode::Unauthorized,
        _ => ErrorCode::InternalServerError,
    }
}

/// 将领域错误转换为统一的 JSON 错误响应
///
/// 5xx 只返回概括信息，细节写入日志。
pub(crate) fn error_response(err: &DriveError, code: ErrorCode) -> HttpResponse {
    let status = status_for(err);
    let message = match status {
        StatusCode::INTERNAL_SERVER_ERROR => {
            tracing::error!("{}", err);
            "Internal server error".to_string()
        }
        StatusCode::SERVICE_UNAVAILABLE => {
            tracing::warn!("{}", err);
            "Service temporarily unavailable".to_string()
        }
        _ => {
            tracing::debug!("{}", err);
            err.message().to_string()
        }
    };

    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

/// 从请求扩展中取出当前用户 ID
pub(crate) fn current_user_id(request: &HttpRequest) -> Result<i64, HttpResponse> {
    RequireJWT::extract_user_id(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DriveError::not_found("x"), StatusCode::NOT_FOUND),
            (DriveError::forbidden("x"), StatusCode::FORBIDDEN),
            (DriveError::conflict("x"), StatusCode::CONFLICT),
            (DriveError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (DriveError::link_expired("x"), StatusCode::GONE),
            (DriveError::store_unavailable("x"), StatusCode::SERVICE_UNAVAILABLE),
            (DriveError::authentication("x"), StatusCode::UNAUTHORIZED),
            (
                DriveError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{err}");
        }
    }

    #[test]
    fn test_error_response_hides_internal_details() {
        let response = error_response(
            &DriveError::database_operation("secret table"),
            ErrorCode::InternalServerError,
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = error_response(&DriveError::conflict("dup"), ErrorCode::Conflict);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
