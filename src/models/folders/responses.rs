use super::entities::Folder;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FolderListResponse {
    pub items: Vec<Folder>,
}

#[derive(Debug, Serialize)]
pub struct FolderDeleteResponse {
    pub folder_id: i64,
    // 级联删除的文件数量
    pub removed_files: usize,
}
