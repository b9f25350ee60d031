//! 文件夹存储操作

use super::SeaOrmStorage;
use crate::entity::files::{Column as FileColumn, Entity as Files};
use crate::entity::folders::{ActiveModel, Column, Entity as Folders};
use crate::errors::{DriveError, Result};
use crate::models::folders::entities::Folder;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 同一所有者、同一父目录下是否已存在同名文件夹
    ///
    /// 根目录的 `parent_id` 为 NULL，复合唯一索引对其不生效；数据库另有部分唯一索引兜底，
    /// 这里提前检查以返回明确的冲突信息。
    async fn sibling_exists<C: ConnectionTrait>(
        conn: &C,
        owner_id: i64,
        name: &str,
        parent_id: Option<i64>,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let mut select = Folders::find()
            .filter(Column::OwnerId.eq(owner_id))
            .filter(Column::Name.eq(name));

        select = match parent_id {
            Some(pid) => select.filter(Column::ParentId.eq(pid)),
            None => select.filter(Column::ParentId.is_null()),
        };

        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let count = select
            .count(conn)
            .await
            .map_err(|e| DriveError::from_db(e, "查询同级文件夹失败"))?;

        Ok(count > 0)
    }

    /// 创建文件夹
    pub async fn create_folder_impl(
        &self,
        owner_id: i64,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Folder> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DriveError::from_db(e, "开启事务失败"))?;

        if let Some(pid) = parent_id {
            let parent = Folders::find_by_id(pid)
                .one(&txn)
                .await
                .map_err(|e| DriveError::from_db(e, "查询父文件夹失败"))?;
            if parent.is_none() {
                return Err(DriveError::not_found(format!("父文件夹 {pid} 不存在")));
            }
        }

        if Self::sibling_exists(&txn, owner_id, name, parent_id, None).await? {
            return Err(DriveError::conflict(format!("文件夹 '{name}' 已存在")));
        }

        let model = ActiveModel {
            owner_id: Set(owner_id),
            name: Set(name.to_string()),
            parent_id: Set(parent_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "创建文件夹失败"))?;

        txn.commit()
            .await
            .map_err(|e| DriveError::from_db(e, "提交事务失败"))?;

        Ok(result.into_folder())
    }

    /// 通过 ID 获取文件夹
    pub async fn get_folder_by_id_impl(&self, folder_id: i64) -> Result<Option<Folder>> {
        let result = Folders::find_by_id(folder_id)
            .one(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件夹失败"))?;

        Ok(result.map(|m| m.into_folder()))
    }

    /// 列出用户的文件夹
    pub async fn list_folders_impl(
        &self,
        owner_id: i64,
        parent_id: Option<i64>,
    ) -> Result<Vec<Folder>> {
        let mut select = Folders::find().filter(Column::OwnerId.eq(owner_id));

        if let Some(pid) = parent_id {
            select = select.filter(Column::ParentId.eq(pid));
        }

        let folders = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件夹列表失败"))?;

        Ok(folders.into_iter().map(|m| m.into_folder()).collect())
    }

    /// 重命名文件夹
    pub async fn rename_folder_impl(&self, folder_id: i64, new_name: &str) -> Result<Folder> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DriveError::from_db(e, "开启事务失败"))?;

        let folder = Folders::find_by_id(folder_id)
            .one(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件夹失败"))?
            .ok_or_else(|| DriveError::not_found(format!("文件夹 {folder_id} 不存在")))?;

        if Self::sibling_exists(
            &txn,
            folder.owner_id,
            new_name,
            folder.parent_id,
            Some(folder_id),
        )
        .await?
        {
            return Err(DriveError::conflict(format!("文件夹 '{new_name}' 已存在")));
        }

        let mut active: ActiveModel = folder.into();
        active.name = Set(new_name.to_string());

        let result = active
            .update(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "重命名文件夹失败"))?;

        txn.commit()
            .await
            .map_err(|e| DriveError::from_db(e, "提交事务失败"))?;

        Ok(result.into_folder())
    }

    /// 删除文件夹
    ///
    /// 子文件夹、文件和权限记录由外键级联删除；删除前收集全部后代文件的存储路径。
    pub async fn delete_folder_impl(&self, folder_id: i64) -> Result<Vec<String>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DriveError::from_db(e, "开启事务失败"))?;

        let exists = Folders::find_by_id(folder_id)
            .one(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件夹失败"))?
            .is_some();
        if !exists {
            return Err(DriveError::not_found(format!("文件夹 {folder_id} 不存在")));
        }

        let mut pending = vec![folder_id];
        let mut subtree = Vec::new();
        while let Some(id) = pending.pop() {
            subtree.push(id);
            let children: Vec<i64> = Folders::find()
                .select_only()
                .column(Column::Id)
                .filter(Column::ParentId.eq(id))
                .into_tuple()
                .all(&txn)
                .await
                .map_err(|e| DriveError::from_db(e, "查询子文件夹失败"))?;
            pending.extend(children);
        }

        let stored_paths: Vec<String> = Files::find()
            .select_only()
            .column(FileColumn::StoredPath)
            .filter(FileColumn::FolderId.is_in(subtree))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "查询文件夹内文件失败"))?;

        Folders::delete_by_id(folder_id)
            .exec(&txn)
            .await
            .map_err(|e| DriveError::from_db(e, "删除文件夹失败"))?;

        txn.commit()
            .await
            .map_err(|e| DriveError::from_db(e, "提交事务失败"))?;

        Ok(stored_paths)
    }
}
