use super::entities::{AccessType, Permission};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FileAccessResponse {
    pub file_id: i64,
    pub access_type: AccessType,
    pub share_token: Option<String>,
    // 分享链接相对路径，only_me 时为空
    pub share_path: Option<String>,
    pub expiry_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Permission> for FileAccessResponse {
    fn from(permission: Permission) -> Self {
        let share_path = permission
            .share_token
            .as_ref()
            .map(|token| format!("/api/v1/share/{token}"));
        Self {
            file_id: permission.file_id,
            access_type: permission.access_type,
            share_token: permission.share_token,
            share_path,
            expiry_time: permission.expiry_time,
        }
    }
}
