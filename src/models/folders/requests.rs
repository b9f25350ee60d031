use serde::Deserialize;

// 创建文件夹请求
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: Option<i64>,
}

// 重命名文件夹请求
#[derive(Debug, Deserialize)]
pub struct RenameFolderRequest {
    pub name: String,
}

// 文件夹列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct FolderListQuery {
    pub parent_id: Option<i64>,
}
