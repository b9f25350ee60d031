use serde::Deserialize;

// 上传查询参数
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub folder_id: Option<i64>,
}

// 创建文件记录（存储层使用）
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    pub owner_id: i64,
    pub folder_id: Option<i64>,
    pub file_name: String,
    pub file_size: i64,
    pub stored_path: String,
    pub mime_type: String,
}
