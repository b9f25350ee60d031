use actix_web::{HttpResponse, Result as ActixResult};

use super::{SharingService, sharing_error_code};
use crate::errors::DriveError;
use crate::models::ErrorCode;
use crate::services::error_response;
use crate::services::files::download::{attachment_response, read_blob};

fn link_error_response(err: &DriveError) -> HttpResponse {
    match err {
        DriveError::NotFound(_) => error_response(err, ErrorCode::ShareLinkNotFound),
        other => error_response(other, sharing_error_code(other)),
    }
}

pub async fn handle_resolve(service: &SharingService, token: String) -> ActixResult<HttpResponse> {
    let file = match service.access.authorize_token(&token).await {
        Ok(file) => file,
        Err(e) => return Ok(link_error_response(&e)),
    };

    // 文件内容可读后才计数
    let body = match read_blob(&file) {
        Ok(body) => body,
        Err(e) => return Ok(error_response(&e, ErrorCode::FileNotFound)),
    };

    let file = match service.access.record_download(&token, file.id).await {
        Ok(file) => file,
        Err(e) => return Ok(link_error_response(&e)),
    };

    tracing::debug!(
        "Share link resolved for file {} (downloads: {})",
        file.id,
        file.download_count
    );

    Ok(attachment_response(&file, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessControl, test_support};
    use crate::models::files::requests::CreateFileRequest;
    use crate::models::permissions::requests::AccessRequest;
    use actix_web::http::StatusCode;

    fn share_with_anyone() -> AccessRequest {
        AccessRequest {
            access_type: "anyone_with_link".to_string(),
            time_unit: None,
            time_value: None,
        }
    }

    #[actix_web::test]
    async fn test_missing_blob_is_not_counted() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let missing = std::env::temp_dir().join(format!("drive-share-{}", uuid::Uuid::new_v4()));
        let file = storage
            .create_file(CreateFileRequest {
                owner_id: owner,
                folder_id: None,
                file_name: "gone.txt".into(),
                file_size: 4,
                stored_path: missing.to_string_lossy().into_owned(),
                mime_type: "text/plain".into(),
            })
            .await
            .unwrap();

        let access = AccessControl::new(storage.clone());
        let token = access
            .set_access(file.id, owner, &share_with_anyone())
            .await
            .unwrap()
            .share_token
            .unwrap();

        let service = SharingService::new(access);
        let response = handle_resolve(&service, token).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let after = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(after.download_count, 0);
    }

    #[actix_web::test]
    async fn test_shared_download_serves_and_counts() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let path = std::env::temp_dir().join(format!("drive-share-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"hello").unwrap();
        let file = storage
            .create_file(CreateFileRequest {
                owner_id: owner,
                folder_id: None,
                file_name: "hello.txt".into(),
                file_size: 5,
                stored_path: path.to_string_lossy().into_owned(),
                mime_type: "text/plain".into(),
            })
            .await
            .unwrap();

        let access = AccessControl::new(storage.clone());
        let token = access
            .set_access(file.id, owner, &share_with_anyone())
            .await
            .unwrap()
            .share_token
            .unwrap();

        let service = SharingService::new(access);
        let response = handle_resolve(&service, token.clone()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let after = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(after.download_count, 1);

        // 未知 token
        let response = handle_resolve(&service, "x".repeat(43)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let _ = std::fs::remove_file(&path);
    }
}
