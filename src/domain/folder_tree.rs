//! 文件夹树管理
//!
//! 同一所有者、同一父目录下文件夹名唯一。删除文件夹时子文件夹、文件及其权限记录由数据库级联删除。
//!
//! 创建子文件夹时只校验父文件夹存在，不校验父文件夹属于同一用户。

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{DriveError, Result};
use crate::models::{files::entities::File, folders::entities::Folder};
use crate::storage::Storage;
use crate::utils::validate::normalize_folder_name;

#[derive(Clone)]
pub struct FolderTree {
    storage: Arc<dyn Storage>,
}

impl FolderTree {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_folder(
        &self,
        name: &str,
        owner_id: i64,
        parent_id: Option<i64>,
    ) -> Result<Folder> {
        let name = normalize_folder_name(name).map_err(DriveError::invalid_input)?;
        let folder = self.storage.create_folder(owner_id, &name, parent_id).await?;
        debug!("User {} created folder {} ({})", owner_id, folder.id, folder.name);
        Ok(folder)
    }

    pub async fn rename_folder(
        &self,
        folder_id: i64,
        new_name: &str,
        requester_id: i64,
    ) -> Result<Folder> {
        let new_name = normalize_folder_name(new_name).map_err(DriveError::invalid_input)?;
        self.owned_folder(folder_id, requester_id).await?;
        self.storage.rename_folder(folder_id, &new_name).await
    }

    /// 删除文件夹，返回被级联删除的文件的存储路径
    pub async fn delete_folder(&self, folder_id: i64, requester_id: i64) -> Result<Vec<String>> {
        self.owned_folder(folder_id, requester_id).await?;
        let removed = self.storage.delete_folder(folder_id).await?;
        info!(
            "User {} deleted folder {} with {} file(s)",
            requester_id,
            folder_id,
            removed.len()
        );
        Ok(removed)
    }

    pub async fn list_folders(&self, owner_id: i64, parent_id: Option<i64>) -> Result<Vec<Folder>> {
        self.storage.list_folders(owner_id, parent_id).await
    }

    /// 列出文件夹中的文件，仅文件夹所有者可见
    pub async fn list_files(&self, folder_id: i64, requester_id: i64) -> Result<Vec<File>> {
        self.owned_folder(folder_id, requester_id).await?;
        self.storage.list_files_in_folder(folder_id).await
    }

    async fn owned_folder(&self, folder_id: i64, requester_id: i64) -> Result<Folder> {
        let folder = self
            .storage
            .get_folder_by_id(folder_id)
            .await?
            .ok_or_else(|| DriveError::not_found(format!("Folder {folder_id} not found")))?;

        if folder.owner_id != requester_id {
            return Err(DriveError::forbidden("Only the owner can modify this folder"));
        }
        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support;

    #[tokio::test]
    async fn test_duplicate_root_folder_conflicts_per_owner() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice@example.com").await;
        let bob = test_support::user(&storage, "bob@example.com").await;
        let tree = FolderTree::new(storage);

        tree.create_folder("Docs", alice, None).await.unwrap();
        let err = tree.create_folder("Docs", alice, None).await.unwrap_err();
        assert!(matches!(err, DriveError::Conflict(_)));

        let other = tree.create_folder("Docs", bob, None).await.unwrap();
        assert_eq!(other.owner_id, bob);
    }

    #[tokio::test]
    async fn test_create_folder_validates_name_and_parent() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice@example.com").await;
        let tree = FolderTree::new(storage);

        for bad in ["", "   ", "a/b", ".."] {
            let err = tree.create_folder(bad, alice, None).await.unwrap_err();
            assert!(matches!(err, DriveError::InvalidInput(_)), "{bad:?}");
        }

        let err = tree.create_folder("Docs", alice, Some(404)).await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));

        let trimmed = tree.create_folder("  Docs  ", alice, None).await.unwrap();
        assert_eq!(trimmed.name, "Docs");
    }

    #[tokio::test]
    async fn test_create_under_foreign_parent_is_allowed() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice@example.com").await;
        let bob = test_support::user(&storage, "bob@example.com").await;
        let tree = FolderTree::new(storage);

        let parent = tree.create_folder("Shared", alice, None).await.unwrap();
        let child = tree.create_folder("Mine", bob, Some(parent.id)).await.unwrap();
        assert_eq!(child.owner_id, bob);
        assert_eq!(child.parent_id, Some(parent.id));
    }

    #[tokio::test]
    async fn test_rename_folder_rules() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice@example.com").await;
        let bob = test_support::user(&storage, "bob@example.com").await;
        let tree = FolderTree::new(storage);

        let docs = tree.create_folder("Docs", alice, None).await.unwrap();
        tree.create_folder("Music", alice, None).await.unwrap();

        let err = tree.rename_folder(404, "X", alice).await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));

        let err = tree.rename_folder(docs.id, "X", bob).await.unwrap_err();
        assert!(matches!(err, DriveError::Forbidden(_)));

        let err = tree.rename_folder(docs.id, "Music", alice).await.unwrap_err();
        assert!(matches!(err, DriveError::Conflict(_)));

        let renamed = tree.rename_folder(docs.id, "Papers", alice).await.unwrap();
        assert_eq!(renamed.name, "Papers");
        assert_eq!(renamed.owner_id, alice);
    }

    #[tokio::test]
    async fn test_delete_folder_cascades_to_descendants() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice@example.com").await;
        let tree = FolderTree::new(storage.clone());

        let parent = tree.create_folder("parent", alice, None).await.unwrap();
        let child = tree
            .create_folder("child", alice, Some(parent.id))
            .await
            .unwrap();
        let file = test_support::file(&storage, alice, Some(child.id)).await;

        let removed = tree.delete_folder(parent.id, alice).await.unwrap();
        assert_eq!(removed, vec![format!("uploads/{alice}/notes")]);

        assert!(storage.get_folder_by_id(parent.id).await.unwrap().is_none());
        assert!(storage.get_folder_by_id(child.id).await.unwrap().is_none());
        assert!(storage.get_file_by_id(file.id).await.unwrap().is_none());
        assert!(
            storage
                .get_permission_by_file_id(file.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_folder_requires_owner() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice@example.com").await;
        let bob = test_support::user(&storage, "bob@example.com").await;
        let tree = FolderTree::new(storage.clone());

        let docs = tree.create_folder("Docs", alice, None).await.unwrap();
        let err = tree.delete_folder(docs.id, bob).await.unwrap_err();
        assert!(matches!(err, DriveError::Forbidden(_)));
        assert!(storage.get_folder_by_id(docs.id).await.unwrap().is_some());

        let err = tree.delete_folder(404, alice).await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_files_requires_owner() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice@example.com").await;
        let bob = test_support::user(&storage, "bob@example.com").await;
        let tree = FolderTree::new(storage.clone());

        let docs = tree.create_folder("Docs", alice, None).await.unwrap();
        test_support::file(&storage, alice, Some(docs.id)).await;
        test_support::file(&storage, alice, None).await;

        assert_eq!(tree.list_files(docs.id, alice).await.unwrap().len(), 1);
        let err = tree.list_files(docs.id, bob).await.unwrap_err();
        assert!(matches!(err, DriveError::Forbidden(_)));
    }
}
