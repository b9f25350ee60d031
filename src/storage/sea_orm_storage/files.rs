//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::file_permissions::{
    ActiveModel as PermissionActiveModel, Column as PermissionColumn,
    Entity as FilePermissions, expiry_to_timestamp,
};
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::errors::{DriveError, Result};
use crate::models::{
    dashboard::responses::DashboardResponse,
    files::{entities::File, requests::CreateFileRequest},
    permissions::entities::AccessType,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建文件记录及其默认权限（同一事务）
    pub async fn create_file_impl(&self, req: CreateFileRequest) -> Result<File> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DriveError::from_db(e, "开启事务失败"))?;

        let model = ActiveModel {
            owner_id: Set(Some(req.owner_id)),
            folder_id: Set(req.folder_id),
            file_name: Set(req.file_name),
            file_size: Set(req.file_size),
            stored_path: Set(req.stored_path),
            mime_type: Set(req.mime_type),
            uploaded_at: Set(chrono::Utc::now().timestamp()),
            download_count: Set(0),
            ..Default::default()
        };

        let file = model
            .insert(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "创建文件记录失败"))?;

        let permission = PermissionActiveModel {
            file_id: Set(file.id),
            access_type: Set(AccessType::ONLY_ME.to_string()),
            share_token: Set(None),
            expiry_time: Set(None),
            ..Default::default()
        };

        permission
            .insert(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "创建文件权限失败"))?;

        txn.commit()
            .await
            .map_err(|e| DriveError::from_db(e, "提交事务失败"))?;

        Ok(file.into_file())
    }

    /// 通过 ID 获取文件
    pub async fn get_file_by_id_impl(&self, file_id: i64) -> Result<Option<File>> {
        let result = Files::find_by_id(file_id)
            .one(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件失败"))?;

        Ok(result.map(|m| m.into_file()))
    }

    /// 列出用户拥有的文件
    pub async fn list_files_for_user_impl(&self, owner_id: i64) -> Result<Vec<File>> {
        let files = Files::find()
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_desc(Column::UploadedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件列表失败"))?;

        Ok(files.into_iter().map(|m| m.into_file()).collect())
    }

    /// 列出文件夹中的文件
    pub async fn list_files_in_folder_impl(&self, folder_id: i64) -> Result<Vec<File>> {
        let files = Files::find()
            .filter(Column::FolderId.eq(folder_id))
            .order_by_asc(Column::FileName)
            .all(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件夹内文件失败"))?;

        Ok(files.into_iter().map(|m| m.into_file()).collect())
    }

    /// 删除文件
    pub async fn delete_file_impl(&self, file_id: i64) -> Result<bool> {
        let result = Files::delete_by_id(file_id)
            .exec(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "删除文件失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 下载计数加一
    ///
    /// 单条 UPDATE 完成自增，并发请求不会丢失计数。
    pub async fn increment_download_count_impl(&self, file_id: i64) -> Result<Option<File>> {
        let result = Files::update_many()
            .col_expr(
                Column::DownloadCount,
                Expr::cust("download_count + 1"),
            )
            .filter(Column::Id.eq(file_id))
            .exec(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "更新下载次数失败"))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_file_by_id_impl(file_id).await
    }

    /// 通过分享链接下载时的计数加一
    ///
    /// 授权条件（token 仍属于该文件、访问方式允许、未过期）与自增写在同一条
    /// UPDATE 中，授权在校验之后被撤销时不会计数。返回 None 表示未授权或文件不存在。
    pub async fn increment_shared_download_count_impl(
        &self,
        file_id: i64,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<File>> {
        let access_type = Expr::col((FilePermissions, PermissionColumn::AccessType));
        let grant = Condition::all()
            .add(
                Expr::col((FilePermissions, PermissionColumn::FileId))
                    .equals((Files, Column::Id)),
            )
            .add(Expr::col((FilePermissions, PermissionColumn::ShareToken)).eq(token))
            .add(
                Condition::any()
                    .add(access_type.clone().eq(AccessType::ANYONE_WITH_LINK))
                    .add(
                        Condition::all()
                            .add(access_type.eq(AccessType::TIMED_ACCESS))
                            .add(
                                Expr::col((FilePermissions, PermissionColumn::ExpiryTime))
                                    .gte(expiry_to_timestamp(now)),
                            ),
                    ),
            );

        let still_granted = Query::select()
            .expr(Expr::val(1))
            .from(FilePermissions)
            .cond_where(grant)
            .to_owned();

        let result = Files::update_many()
            .col_expr(Column::DownloadCount, Expr::cust("download_count + 1"))
            .filter(Column::Id.eq(file_id))
            .filter(Expr::exists(still_granted))
            .exec(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "更新下载次数失败"))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_file_by_id_impl(file_id).await
    }

    /// 用户存储概览
    pub async fn get_usage_summary_impl(&self, owner_id: i64) -> Result<DashboardResponse> {
        let rows: Vec<(i64, i64)> = Files::find()
            .select_only()
            .column(Column::FileSize)
            .column(Column::DownloadCount)
            .filter(Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询存储概览失败"))?;

        Ok(rows.into_iter().fold(
            DashboardResponse::default(),
            |mut summary, (size, downloads)| {
                summary.total_files += 1;
                summary.total_storage += size;
                summary.total_downloads += downloads;
                summary
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_file(owner_id: i64, folder_id: Option<i64>, size: i64) -> CreateFileRequest {
        CreateFileRequest {
            owner_id,
            folder_id,
            file_name: "report.pdf".into(),
            file_size: size,
            stored_path: format!("uploads/{owner_id}/blob"),
            mime_type: "application/pdf".into(),
        }
    }

    #[tokio::test]
    async fn test_create_file_creates_only_me_permission() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage.create_user_impl("a@example.com", "h").await.unwrap();

        let file = storage.create_file_impl(new_file(user.id, None, 10)).await.unwrap();
        assert_eq!(file.owner_id, Some(user.id));
        assert_eq!(file.download_count, 0);

        let permission = storage
            .get_permission_by_file_id_impl(file.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(permission.access_type, AccessType::OnlyMe);
        assert!(permission.share_token.is_none());
        assert!(permission.expiry_time.is_none());
    }

    #[tokio::test]
    async fn test_create_file_in_missing_folder_rolls_back() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage.create_user_impl("a@example.com", "h").await.unwrap();

        let err = storage
            .create_file_impl(new_file(user.id, Some(404), 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));
        assert!(storage.list_files_for_user_impl(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_increment_and_summary() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage.create_user_impl("a@example.com", "h").await.unwrap();
        let first = storage.create_file_impl(new_file(user.id, None, 100)).await.unwrap();
        storage.create_file_impl(new_file(user.id, None, 50)).await.unwrap();

        let updated = storage
            .increment_download_count_impl(first.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.download_count, 1);
        storage.increment_download_count_impl(first.id).await.unwrap();

        assert!(storage.increment_download_count_impl(9999).await.unwrap().is_none());

        let summary = storage.get_usage_summary_impl(user.id).await.unwrap();
        assert_eq!(
            summary,
            DashboardResponse {
                total_files: 2,
                total_storage: 150,
                total_downloads: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_file_cascades_permission() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage.create_user_impl("a@example.com", "h").await.unwrap();
        let file = storage.create_file_impl(new_file(user.id, None, 1)).await.unwrap();

        assert!(storage.delete_file_impl(file.id).await.unwrap());
        assert!(!storage.delete_file_impl(file.id).await.unwrap());
        assert!(
            storage
                .get_permission_by_file_id_impl(file.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_shared_download_count_requires_live_grant() {
        use crate::models::permissions::entities::PermissionChange;
        use chrono::Duration;

        let storage = SeaOrmStorage::in_memory().await;
        let user = storage.create_user_impl("a@example.com", "h").await.unwrap();
        let file = storage.create_file_impl(new_file(user.id, None, 10)).await.unwrap();
        let now = Utc::now();

        // only_me 下任何 token 都不计数
        assert!(
            storage
                .increment_shared_download_count_impl(file.id, "tok", now)
                .await
                .unwrap()
                .is_none()
        );

        storage
            .update_permission_impl(
                file.id,
                PermissionChange {
                    access_type: AccessType::AnyoneWithLink,
                    share_token: Some("tok".into()),
                    expiry_time: None,
                },
            )
            .await
            .unwrap();

        let counted = storage
            .increment_shared_download_count_impl(file.id, "tok", now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(counted.download_count, 1);

        assert!(
            storage
                .increment_shared_download_count_impl(file.id, "other", now)
                .await
                .unwrap()
                .is_none()
        );

        storage
            .update_permission_impl(
                file.id,
                PermissionChange {
                    access_type: AccessType::TimedAccess,
                    share_token: Some("tok".into()),
                    expiry_time: Some(now),
                },
            )
            .await
            .unwrap();

        let counted = storage
            .increment_shared_download_count_impl(file.id, "tok", now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(counted.download_count, 2);

        assert!(
            storage
                .increment_shared_download_count_impl(file.id, "tok", now + Duration::seconds(2))
                .await
                .unwrap()
                .is_none()
        );

        let after = storage.get_file_by_id_impl(file.id).await.unwrap().unwrap();
        assert_eq!(after.download_count, 2);
    }
}
