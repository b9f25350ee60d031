use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FolderService, folder_error_code};
use crate::models::ApiResponse;
use crate::models::files::responses::FileListResponse;
use crate::models::folders::{requests::FolderListQuery, responses::FolderListResponse};
use crate::services::{current_user_id, error_response};

pub async fn handle_list_folders(
    service: &FolderService,
    request: &HttpRequest,
    query: FolderListQuery,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match service.tree.list_folders(user_id, query.parent_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FolderListResponse { items },
            "Folders retrieved",
        ))),
        Err(e) => Ok(error_response(&e, folder_error_code(&e))),
    }
}

pub async fn handle_list_folder_files(
    service: &FolderService,
    request: &HttpRequest,
    folder_id: i64,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match service.tree.list_files(folder_id, user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FileListResponse { items },
            "Files retrieved",
        ))),
        Err(e) => Ok(error_response(&e, folder_error_code(&e))),
    }
}
