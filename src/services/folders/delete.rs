use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fs;

use super::{FolderService, folder_error_code};
use crate::errors::DriveError;
use crate::models::ApiResponse;
use crate::models::folders::responses::FolderDeleteResponse;
use crate::services::{current_user_id, error_response};

pub async fn handle_delete_folder(
    service: &FolderService,
    request: &HttpRequest,
    folder_id: i64,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    let removed = match service.tree.delete_folder(folder_id, user_id).await {
        Ok(paths) => paths,
        Err(e) => return Ok(error_response(&e, folder_error_code(&e))),
    };

    // 数据库已提交，清理磁盘上的文件；失败只记录日志
    for path in &removed {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(
                "{}",
                DriveError::file_operation(format!("删除文件 {path} 失败: {e}"))
            );
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FolderDeleteResponse {
            folder_id,
            removed_files: removed.len(),
        },
        "Folder deleted",
    )))
}
