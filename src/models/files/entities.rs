use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    pub id: i64,
    // 所属用户被删除后为空
    pub owner_id: Option<i64>,
    // 为空表示位于根目录
    pub folder_id: Option<i64>,
    // 原始文件名
    pub file_name: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
    // 磁盘上的存储路径
    #[serde(skip_serializing, default)]
    pub stored_path: String,
    pub mime_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub download_count: i64,
}

impl File {
    /// 判断用户是否为文件所有者
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == Some(user_id)
    }
}
