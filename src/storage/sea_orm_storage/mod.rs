//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 所有 `DbErr` 都经由 [`DriveError::from_db`] 转换后返回。

mod files;
mod folders;
mod permissions;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{DriveError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| DriveError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| DriveError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| DriveError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| DriveError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(DriveError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用内存数据库
    ///
    /// 单连接池，保证所有查询落在同一个内存库上。
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("memory url")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .expect("connect sqlite memory");
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Self::migrate(&db).await.expect("migrate");
        Self { db }
    }
}

// Storage trait 实现
use crate::models::{
    dashboard::responses::DashboardResponse,
    files::{entities::File, requests::CreateFileRequest},
    folders::entities::Folder,
    permissions::entities::{Permission, PermissionChange},
    users::entities::User,
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        self.create_user_impl(email, password_hash).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    // 文件夹模块
    async fn create_folder(
        &self,
        owner_id: i64,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Folder> {
        self.create_folder_impl(owner_id, name, parent_id).await
    }

    async fn get_folder_by_id(&self, folder_id: i64) -> Result<Option<Folder>> {
        self.get_folder_by_id_impl(folder_id).await
    }

    async fn list_folders(&self, owner_id: i64, parent_id: Option<i64>) -> Result<Vec<Folder>> {
        self.list_folders_impl(owner_id, parent_id).await
    }

    async fn rename_folder(&self, folder_id: i64, new_name: &str) -> Result<Folder> {
        self.rename_folder_impl(folder_id, new_name).await
    }

    async fn delete_folder(&self, folder_id: i64) -> Result<Vec<String>> {
        self.delete_folder_impl(folder_id).await
    }

    // 文件模块
    async fn create_file(&self, file: CreateFileRequest) -> Result<File> {
        self.create_file_impl(file).await
    }

    async fn get_file_by_id(&self, file_id: i64) -> Result<Option<File>> {
        self.get_file_by_id_impl(file_id).await
    }

    async fn list_files_for_user(&self, owner_id: i64) -> Result<Vec<File>> {
        self.list_files_for_user_impl(owner_id).await
    }

    async fn list_files_in_folder(&self, folder_id: i64) -> Result<Vec<File>> {
        self.list_files_in_folder_impl(folder_id).await
    }

    async fn delete_file(&self, file_id: i64) -> Result<bool> {
        self.delete_file_impl(file_id).await
    }

    async fn increment_download_count(&self, file_id: i64) -> Result<Option<File>> {
        self.increment_download_count_impl(file_id).await
    }

    async fn increment_shared_download_count(
        &self,
        file_id: i64,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<File>> {
        self.increment_shared_download_count_impl(file_id, token, now)
            .await
    }

    // 权限模块
    async fn get_permission_by_file_id(&self, file_id: i64) -> Result<Option<Permission>> {
        self.get_permission_by_file_id_impl(file_id).await
    }

    async fn get_permission_by_token(&self, token: &str) -> Result<Option<Permission>> {
        self.get_permission_by_token_impl(token).await
    }

    async fn update_permission(
        &self,
        file_id: i64,
        change: PermissionChange,
    ) -> Result<Permission> {
        self.update_permission_impl(file_id, change).await
    }

    // 统计模块
    async fn get_usage_summary(&self, owner_id: i64) -> Result<DashboardResponse> {
        self.get_usage_summary_impl(owner_id).await
    }
}
