use serde::{Deserialize, Serialize};

// 文件夹实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    // 为空表示位于根目录
    pub parent_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
