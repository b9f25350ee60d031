use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::DatabaseConfig;
use crate::models::{
    dashboard::responses::DashboardResponse,
    files::{entities::File, requests::CreateFileRequest},
    folders::entities::Folder,
    permissions::entities::{Permission, PermissionChange},
    users::entities::User,
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（邮箱重复返回 Conflict）
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 文件夹管理方法
    // 创建文件夹：父文件夹不存在返回 NotFound，同级重名返回 Conflict
    async fn create_folder(
        &self,
        owner_id: i64,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Folder>;
    // 通过ID获取文件夹
    async fn get_folder_by_id(&self, folder_id: i64) -> Result<Option<Folder>>;
    // 列出用户的文件夹，`parent_id` 为空时列出全部
    async fn list_folders(&self, owner_id: i64, parent_id: Option<i64>) -> Result<Vec<Folder>>;
    // 重命名文件夹：同级重名返回 Conflict
    async fn rename_folder(&self, folder_id: i64, new_name: &str) -> Result<Folder>;
    // 删除文件夹及其全部后代，返回被级联删除文件的存储路径
    async fn delete_folder(&self, folder_id: i64) -> Result<Vec<String>>;

    /// 文件管理方法
    // 创建文件记录，并在同一事务中创建 only_me 权限记录
    async fn create_file(&self, file: CreateFileRequest) -> Result<File>;
    // 通过ID获取文件
    async fn get_file_by_id(&self, file_id: i64) -> Result<Option<File>>;
    // 列出用户拥有的全部文件
    async fn list_files_for_user(&self, owner_id: i64) -> Result<Vec<File>>;
    // 列出文件夹中的文件
    async fn list_files_in_folder(&self, folder_id: i64) -> Result<Vec<File>>;
    // 删除文件（权限记录级联删除）
    async fn delete_file(&self, file_id: i64) -> Result<bool>;
    // 下载计数原子加一，返回更新后的文件
    async fn increment_download_count(&self, file_id: i64) -> Result<Option<File>>;
    // 分享链接下载计数加一，授权失效时不计数并返回 None
    async fn increment_shared_download_count(
        &self,
        file_id: i64,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<File>>;

    /// 权限管理方法
    // 获取文件的权限记录
    async fn get_permission_by_file_id(&self, file_id: i64) -> Result<Option<Permission>>;
    // 通过分享 token 查找权限记录
    async fn get_permission_by_token(&self, token: &str) -> Result<Option<Permission>>;
    // 覆盖文件已有的权限记录（不会新建）
    async fn update_permission(&self, file_id: i64, change: PermissionChange)
    -> Result<Permission>;

    /// 统计方法
    async fn get_usage_summary(&self, owner_id: i64) -> Result<DashboardResponse>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
