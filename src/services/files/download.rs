use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::fs::File as FsFile;
use std::io::Read;
use std::path::Path;

use super::{FileService, file_error_code};
use crate::errors::DriveError;
use crate::models::files::entities::File;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user_id, error_response};

/// 读取磁盘上的文件内容
pub(crate) fn read_blob(file: &File) -> Result<Vec<u8>, DriveError> {
    if !Path::new(&file.stored_path).exists() {
        return Err(DriveError::not_found("File missing on server"));
    }

    let mut buf = Vec::new();
    FsFile::open(&file.stored_path)
        .and_then(|mut f| f.read_to_end(&mut buf))
        .map_err(|e| DriveError::file_operation(format!("读取 {} 失败: {e}", file.stored_path)))?;
    Ok(buf)
}

/// 以附件形式返回文件内容，使用数据库中的原始文件名
pub(crate) fn attachment_response(file: &File, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.mime_type.as_str()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ))
        .body(body)
}

pub async fn handle_download(
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
            "Only the owner can download this file",
        )));
    }

    let body = match read_blob(&db_file) {
        Ok(body) => body,
        Err(e) => return Ok(error_response(&e, file_error_code(&e))),
    };

    let db_file = match service.storage.increment_download_count(file_id).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, file_error_code(&e))),
    };

    Ok(attachment_response(&db_file, body))
}
