use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FolderService, folder_error_code};
use crate::models::ApiResponse;
use crate::models::folders::requests::RenameFolderRequest;
use crate::services::{current_user_id, error_response};

pub async fn handle_rename_folder(
    service: &FolderService,
    request: &HttpRequest,
    folder_id: i64,
    body: RenameFolderRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match service
        .tree
        .rename_folder(folder_id, &body.name, user_id)
        .await
    {
        Ok(folder) => Ok(HttpResponse::Ok().json(ApiResponse::success(folder, "Folder renamed"))),
        Err(e) => Ok(error_response(&e, folder_error_code(&e))),
    }
}
