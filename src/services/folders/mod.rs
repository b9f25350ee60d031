pub mod create;
pub mod delete;
pub mod list;
pub mod rename;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::domain::FolderTree;
use crate::errors::DriveError;
use crate::models::ErrorCode;
use crate::models::folders::requests::{CreateFolderRequest, FolderListQuery, RenameFolderRequest};
use crate::services::default_code;

pub struct FolderService {
    tree: FolderTree,
}

impl FolderService {
    pub fn new(tree: FolderTree) -> Self {
        Self { tree }
    }

    pub async fn create_folder(
        &self,
        request: &HttpRequest,
        body: CreateFolderRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_folder(self, request, body).await
    }

    pub async fn list_folders(
        &self,
        request: &HttpRequest,
        query: FolderListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_folders(self, request, query).await
    }

    pub async fn list_folder_files(
        &self,
        request: &HttpRequest,
        folder_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_folder_files(self, request, folder_id).await
    }

    pub async fn rename_folder(
        &self,
        request: &HttpRequest,
        folder_id: i64,
        body: RenameFolderRequest,
    ) -> ActixResult<HttpResponse> {
        rename::handle_rename_folder(self, request, folder_id, body).await
    }

    pub async fn delete_folder(
        &self,
        request: &HttpRequest,
        folder_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::handle_delete_folder(self, request, folder_id).await
    }
}

/// 文件夹相关错误的业务码
pub(crate) fn folder_error_code(err: &DriveError) -> ErrorCode {
    match err {
        DriveError::NotFound(_) => ErrorCode::FolderNotFound,
        DriveError::Forbidden(_) => ErrorCode::FolderPermissionDenied,
        DriveError::Conflict(_) => ErrorCode::FolderAlreadyExists,
        DriveError::InvalidInput(_) => ErrorCode::FolderNameInvalid,
        other => default_code(other),
    }
}
