pub mod delete;
pub mod download;
pub mod list;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::errors::DriveError;
use crate::models::ErrorCode;
use crate::models::files::requests::UploadQuery;
use crate::services::default_code;
use crate::storage::Storage;

pub struct FileService {
    storage: Arc<dyn Storage>,
    upload: UploadConfig,
}

impl FileService {
    pub fn new(storage: Arc<dyn Storage>, upload: UploadConfig) -> Self {
        Self { storage, upload }
    }

    // Handle file upload
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        query: UploadQuery,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, query, payload).await
    }

    pub async fn list_files(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::handle_list_files(self, request).await
    }

    // Handle file download
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        file_id: i64,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, file_id).await
    }

    pub async fn delete_file(&self, request: &HttpRequest, file_id: i64) -> ActixResult<HttpResponse> {
        delete::handle_delete_file(self, request, file_id).await
    }
}

/// 文件相关错误的业务码
pub(crate) fn file_error_code(err: &DriveError) -> ErrorCode {
    match err {
        DriveError::NotFound(_) => ErrorCode::FileNotFound,
        DriveError::Forbidden(_) => ErrorCode::FilePermissionDenied,
        other => default_code(other),
    }
}
