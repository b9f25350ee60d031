use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FileService, file_error_code};
use crate::models::ApiResponse;
use crate::models::files::responses::FileListResponse;
use crate::services::{current_user_id, error_response};

pub async fn handle_list_files(
    service: &FileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    match service.storage.list_files_for_user(user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FileListResponse { items },
            "Files retrieved",
        ))),
        Err(e) => Ok(error_response(&e, file_error_code(&e))),
    }
}
