use super::entities::File;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FileUploadResponse {
    pub id: i64,
    /// 原始文件名
    pub file_name: String,
    /// 文件大小(字节)
    pub size: i64,
    /// 文件类型
    pub content_type: String,
    pub folder_id: Option<i64>,
    /// 上传时间
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub items: Vec<File>,
}
