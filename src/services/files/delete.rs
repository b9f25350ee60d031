use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fs;

use super::{FileService, file_error_code};
use crate::errors::DriveError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user_id, error_response};

pub async fn handle_delete_file(
    service: &FileService,
    request: &HttpRequest,
    file_id: i64,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    let db_file = match service.storage.get_file_by_id(file_id).await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, file_error_code(&e))),
    };

    if !db_file.is_owned_by(user_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::FilePermissionDenied,
            "Only the owner can delete this file",
        )));
    }

    // 权限记录由外键级联删除
    if let Err(e) = service.storage.delete_file(file_id).await {
        return Ok(error_response(&e, file_error_code(&e)));
    }

    if let Err(e) = fs::remove_file(&db_file.stored_path) {
        tracing::warn!(
            "{}",
            DriveError::file_operation(format!("删除文件 {} 失败: {e}", db_file.stored_path))
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("File deleted successfully")))
}
