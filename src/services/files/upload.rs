use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{FileService, file_error_code};
use crate::errors::DriveError;
use crate::models::ErrorCode;
use crate::models::files::requests::{CreateFileRequest, UploadQuery};
use crate::models::{ApiResponse, files::responses::FileUploadResponse};
use crate::services::{current_user_id, error_response};
use crate::utils::validate::sanitize_file_name;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    query: UploadQuery,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user_id = match current_user_id(req) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    // 目标文件夹必须存在且属于当前用户
    if let Some(folder_id) = query.folder_id {
        match service.storage.get_folder_by_id(folder_id).await {
            Ok(Some(folder)) if folder.owner_id == user_id => {}
            Ok(Some(_)) => {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::FolderPermissionDenied,
                    "Folder does not belong to you",
                )));
            }
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::FolderNotFound,
                    "Folder not found",
                )));
            }
            Err(e) => return Ok(error_response(&e, ErrorCode::FileUploadFailed)),
        }
    }

    // 每个用户一个子目录
    let user_dir = Path::new(&service.upload.dir).join(user_id.to_string());
    if let Err(e) = fs::create_dir_all(&user_dir) {
        tracing::error!("{}", DriveError::file_operation(format!("{e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                ErrorCode::FileUploadFailed,
                "Failed to create upload directory",
            )),
        );
    }

    // 文件相关信息
    let mut original_name = String::new();
    let mut file_size: i64 = 0;
    let mut file_uploaded = false;
    let mut mime_type = String::new();
    let mut stored_path = PathBuf::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }

        if file_uploaded {
            let _ = fs::remove_file(&stored_path);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            )));
        }
        file_uploaded = true;

        original_name = sanitize_file_name(
            content_disposition
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default(),
        );

        mime_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        stored_path = user_dir.join(format!("{}-{}", Uuid::new_v4(), original_name));
        let mut f = match fs::File::create(&stored_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("{}", DriveError::file_operation(format!("{e}")));
                return Ok(HttpResponse::InternalServerError().json(
                    ApiResponse::<()>::error_empty(
                        ErrorCode::FileUploadFailed,
                        "Failed to create file",
                    ),
                ));
            }
        };

        let mut total_size: usize = 0;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    let _ = fs::remove_file(&stored_path);
                    return Err(e.into());
                }
            };

            total_size += data.len();
            // 校验大小
            if total_size > service.upload.max_size {
                let _ = fs::remove_file(&stored_path);
                return Ok(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                )));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&stored_path);
                return Err(e.into());
            }
        }
        file_size = total_size as i64;
    }

    if !file_uploaded {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "No file found in upload payload",
        )));
    }

    let create = CreateFileRequest {
        owner_id: user_id,
        folder_id: query.folder_id,
        file_name: original_name,
        file_size,
        stored_path: stored_path.to_string_lossy().into_owned(),
        mime_type,
    };

    match service.storage.create_file(create).await {
        Ok(file) => {
            tracing::info!("User {} uploaded file {} ({} bytes)", user_id, file.id, file.file_size);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                FileUploadResponse {
                    id: file.id,
                    file_name: file.file_name,
                    size: file.file_size,
                    content_type: file.mime_type,
                    folder_id: file.folder_id,
                    uploaded_at: file.uploaded_at,
                },
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            // 记录未写入，删除已落盘的文件
            let _ = fs::remove_file(&stored_path);
            Ok(error_response(&e, file_error_code(&e)))
        }
    }
}
