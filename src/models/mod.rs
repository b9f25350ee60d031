pub mod auth;
pub mod common;
pub mod dashboard;
pub mod files;
pub mod folders;
pub mod permissions;
pub mod users;

pub use common::ApiResponse;

use serde::{Deserialize, Serialize};

/// 程序启动时间
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 `ApiResponse.code` 返回给客户端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,
    ServiceUnavailable = 1503,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserEmailInvalid = 2002,
    UserPasswordInvalid = 2003,
    UserEmailAlreadyExists = 2004,
    TokenExpired = 2005,

    // 文件夹
    FolderNotFound = 3000,
    FolderAlreadyExists = 3001,
    FolderPermissionDenied = 3002,
    FolderNameInvalid = 3003,

    // 文件
    FileNotFound = 4000,
    FileUploadFailed = 4001,
    FileSizeExceeded = 4002,
    MultifileUploadNotAllowed = 4003,
    FilePermissionDenied = 4004,

    // 分享链接
    AccessTypeInvalid = 5000,
    ShareLinkNotFound = 5001,
    ShareLinkExpired = 5002,
}
