use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FolderService, folder_error_code};
use crate::models::ApiResponse;
use crate::models::folders::requests::CreateFolderRequest;
use crate::services::{current_user_id, error_response};

pub async fn handle_create_folder(
    service: &FolderService,
    request: &HttpRequest,
    body: CreateFolderRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match service
        .tree
        .create_folder(&body.name, user_id, body.parent_id)
        .await
    {
        Ok(folder) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(folder, "Folder created")))
        }
        Err(e) => Ok(error_response(&e, folder_error_code(&e))),
    }
}
