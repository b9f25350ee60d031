pub mod access;
pub mod resolve;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::domain::AccessControl;
use crate::errors::DriveError;
use crate::models::ErrorCode;
use crate::models::permissions::requests::AccessRequest;
use crate::services::default_code;

pub struct SharingService {
    access: AccessControl,
}

impl SharingService {
    pub fn new(access: AccessControl) -> Self {
        Self { access }
    }

    // 修改文件访问方式
    pub async fn set_access(
        &self,
        request: &HttpRequest,
        file_id: i64,
        body: AccessRequest,
    ) -> ActixResult<HttpResponse> {
        access::handle_set_access(self, request, file_id, body).await
    }

    // 通过分享链接下载
    pub async fn resolve(&self, token: String) -> ActixResult<HttpResponse> {
        resolve::handle_resolve(self, token).await
    }
}

/// 分享相关错误的业务码
pub(crate) fn sharing_error_code(err: &DriveError) -> ErrorCode {
    match err {
        DriveError::Forbidden(_) => ErrorCode::FilePermissionDenied,
        DriveError::InvalidInput(_) => ErrorCode::AccessTypeInvalid,
        DriveError::LinkExpired(_) => ErrorCode::ShareLinkExpired,
        other => default_code(other),
    }
}
