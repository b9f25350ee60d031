use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SharingService, sharing_error_code};
use crate::errors::DriveError;
use crate::models::permissions::{requests::AccessRequest, responses::FileAccessResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user_id, error_response};

pub async fn handle_set_access(
    service: &SharingService,
    request: &HttpRequest,
    file_id: i64,
    body: AccessRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match service.access.set_access(file_id, user_id, &body).await {
        Ok(permission) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FileAccessResponse::from(permission),
            "File access updated",
        ))),
        Err(e @ DriveError::NotFound(_)) => Ok(error_response(&e, ErrorCode::FileNotFound)),
        Err(e) => Ok(error_response(&e, sharing_error_code(&e))),
    }
}
