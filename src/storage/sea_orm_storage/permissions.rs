//! 文件权限存储操作

use super::SeaOrmStorage;
use crate::entity::file_permissions::{
    ActiveModel, Column, Entity as FilePermissions, expiry_to_timestamp,
};
use crate::errors::{DriveError, Result};
use crate::models::permissions::entities::{Permission, PermissionChange};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 获取文件的权限记录
    pub async fn get_permission_by_file_id_impl(&self, file_id: i64) -> Result<Option<Permission>> {
        let result = FilePermissions::find()
            .filter(Column::FileId.eq(file_id))
            .one(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件权限失败"))?;

        Ok(result.map(|m| m.into_permission()))
    }

    /// 通过分享 token 获取权限记录
    pub async fn get_permission_by_token_impl(&self, token: &str) -> Result<Option<Permission>> {
        let result = FilePermissions::find()
            .filter(Column::ShareToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询分享链接失败"))?;

        Ok(result.map(|m| m.into_permission()))
    }

    /// 覆盖文件已有的权限记录
    pub async fn update_permission_impl(
        &self,
        file_id: i64,
        change: PermissionChange,
    ) -> Result<Permission> {
        let existing = FilePermissions::find()
            .filter(Column::FileId.eq(file_id))
            .one(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件权限失败"))?
            .ok_or_else(|| DriveError::not_found(format!("文件 {file_id} 的权限记录不存在")))?;

        let mut active: ActiveModel = existing.into();
        active.access_type = Set(change.access_type.to_string());
        active.share_token = Set(change.share_token);
        active.expiry_time = Set(change.expiry_time.map(expiry_to_timestamp));

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "更新文件权限失败"))?;

        Ok(result.into_permission())
    }
}
