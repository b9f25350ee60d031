//! 核心领域逻辑：分享权限状态机与文件夹树

pub mod access_control;
pub mod folder_tree;

pub use access_control::AccessControl;
pub use folder_tree::FolderTree;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::models::files::{entities::File, requests::CreateFileRequest};
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

    pub async fn storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::in_memory().await)
    }

    pub async fn user(storage: &Arc<dyn Storage>, email: &str) -> i64 {
        storage.create_user(email, "hash").await.unwrap().id
    }

    pub async fn file(storage: &Arc<dyn Storage>, owner_id: i64, folder_id: Option<i64>) -> File {
        storage
            .create_file(CreateFileRequest {
                owner_id,
                folder_id,
                file_name: "notes.txt".into(),
                file_size: 42,
                stored_path: format!("uploads/{owner_id}/notes"),
                mime_type: "text/plain".into(),
            })
            .await
            .unwrap()
    }
}
