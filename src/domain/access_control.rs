//! 文件访问控制
//!
//! 每个文件有且仅有一条权限记录，三种状态之间由所有者自由切换：
//!
//! | 状态 | share_token | expiry_time |
//! |---|---|---|
//! | `only_me` | 空 | 空 |
//! | `anyone_with_link` | 新生成 | 空 |
//! | `timed_access` | 新生成 | `now + 时长` |
//!
//! 过期不会改变状态，只影响 [`AccessControl::resolve_by_token`] 的判定。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{DriveError, Result};
use crate::models::files::entities::File;
use crate::models::permissions::{
    entities::{AccessType, Permission, PermissionChange, TimeUnit},
    requests::AccessRequest,
};
use crate::storage::Storage;
use crate::utils::random_code::generate_share_token;

#[derive(Clone)]
pub struct AccessControl {
    storage: Arc<dyn Storage>,
}

impl AccessControl {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 修改文件的访问方式，仅所有者可操作
    pub async fn set_access(
        &self,
        file_id: i64,
        requester_id: i64,
        request: &AccessRequest,
    ) -> Result<Permission> {
        self.set_access_at(file_id, requester_id, request, Utc::now())
            .await
    }

    pub async fn set_access_at(
        &self,
        file_id: i64,
        requester_id: i64,
        request: &AccessRequest,
        now: DateTime<Utc>,
    ) -> Result<Permission> {
        let file = self
            .storage
            .get_file_by_id(file_id)
            .await?
            .ok_or_else(|| DriveError::not_found(format!("File {file_id} not found")))?;

        if !file.is_owned_by(requester_id) {
            info!(
                "User {} tried to change access of file {} owned by {:?}",
                requester_id, file_id, file.owner_id
            );
            return Err(DriveError::forbidden(
                "Only the owner can change file access",
            ));
        }

        let change = plan_access(request, now, generate_share_token)?;
        let permission = self.storage.update_permission(file_id, change).await?;

        debug!(
            "File {} access set to {} by user {}",
            file_id, permission.access_type, requester_id
        );
        Ok(permission)
    }

    /// 通过分享 token 获取文件；授权成功时下载计数加一
    pub async fn resolve_by_token(&self, token: &str) -> Result<File> {
        self.resolve_by_token_at(token, Utc::now()).await
    }

    pub async fn resolve_by_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<File> {
        let file = self.authorize_token_at(token, now).await?;
        self.record_download_at(token, file.id, now).await
    }

    /// 校验分享 token 并返回对应文件，不计数
    ///
    /// 调用方在确认文件可读后再调用 [`AccessControl::record_download`]。
    pub async fn authorize_token(&self, token: &str) -> Result<File> {
        self.authorize_token_at(token, Utc::now()).await
    }

    pub async fn authorize_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<File> {
        let permission = self
            .storage
            .get_permission_by_token(token)
            .await?
            .ok_or_else(|| DriveError::not_found("Share link not found"))?;

        check_grant(&permission, now)?;

        self.storage
            .get_file_by_id(permission.file_id)
            .await?
            .ok_or_else(|| DriveError::not_found("Shared file no longer exists"))
    }

    /// 记录一次分享下载；授权在校验之后失效时不计数
    pub async fn record_download(&self, token: &str, file_id: i64) -> Result<File> {
        self.record_download_at(token, file_id, Utc::now()).await
    }

    pub async fn record_download_at(
        &self,
        token: &str,
        file_id: i64,
        now: DateTime<Utc>,
    ) -> Result<File> {
        if let Some(file) = self
            .storage
            .increment_shared_download_count(file_id, token, now)
            .await?
        {
            return Ok(file);
        }

        // 未计数：重新读取权限以给出准确的原因
        debug!("Share link for file {} no longer grants access", file_id);
        let permission = self
            .storage
            .get_permission_by_token(token)
            .await?
            .filter(|permission| permission.file_id == file_id)
            .ok_or_else(|| DriveError::not_found("Share link not found"))?;
        check_grant(&permission, now)?;

        Err(DriveError::not_found("Shared file no longer exists"))
    }
}

/// 根据请求计算权限记录的新状态
///
/// `new_token` 只在需要分享链接时调用，每次调用都应返回新的随机 token。
pub fn plan_access(
    request: &AccessRequest,
    now: DateTime<Utc>,
    new_token: impl FnOnce() -> String,
) -> Result<PermissionChange> {
    let access_type = request
        .access_type
        .parse::<AccessType>()
        .map_err(DriveError::invalid_input)?;

    let change = match access_type {
        AccessType::OnlyMe => PermissionChange {
            access_type,
            share_token: None,
            expiry_time: None,
        },
        AccessType::AnyoneWithLink => PermissionChange {
            access_type,
            share_token: Some(new_token()),
            expiry_time: None,
        },
        AccessType::TimedAccess => {
            let unit = request
                .time_unit
                .as_deref()
                .ok_or_else(|| DriveError::invalid_input("time_unit is required for timed_access"))?
                .parse::<TimeUnit>()
                .map_err(DriveError::invalid_input)?;

            let value = match request.time_value {
                Some(value) if value > 0 => value,
                _ => {
                    return Err(DriveError::invalid_input(
                        "time_value must be a positive integer for timed_access",
                    ));
                }
            };

            let expiry_time = unit
                .duration(value)
                .and_then(|duration| now.checked_add_signed(duration))
                .ok_or_else(|| DriveError::invalid_input("time_value is too large"))?;

            PermissionChange {
                access_type,
                share_token: Some(new_token()),
                expiry_time: Some(expiry_time),
            }
        }
    };

    Ok(change)
}

/// 判断权限记录在 `now` 时刻是否允许通过链接访问
pub fn check_grant(permission: &Permission, now: DateTime<Utc>) -> Result<()> {
    match permission.access_type {
        // 正常情况下 only_me 不会持有 token
        AccessType::OnlyMe => Err(DriveError::not_found("Share link not found")),
        AccessType::AnyoneWithLink => Ok(()),
        AccessType::TimedAccess => match permission.expiry_time {
            Some(expiry) if now <= expiry => Ok(()),
            _ => Err(DriveError::link_expired("Share link has expired")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support;
    use chrono::{Duration, Timelike};

    fn request(access_type: &str, unit: Option<&str>, value: Option<i64>) -> AccessRequest {
        AccessRequest {
            access_type: access_type.to_string(),
            time_unit: unit.map(str::to_string),
            time_value: value,
        }
    }

    fn fixed_token() -> String {
        "token".to_string()
    }

    #[test]
    fn test_plan_only_me_clears_link() {
        let change = plan_access(&request("only_me", None, None), Utc::now(), || {
            panic!("only_me must not generate a token")
        })
        .unwrap();
        assert_eq!(change.access_type, AccessType::OnlyMe);
        assert!(change.share_token.is_none());
        assert!(change.expiry_time.is_none());
    }

    #[test]
    fn test_plan_anyone_with_link() {
        let change =
            plan_access(&request("anyone_with_link", None, None), Utc::now(), fixed_token).unwrap();
        assert_eq!(change.share_token.as_deref(), Some("token"));
        assert!(change.expiry_time.is_none());
    }

    #[test]
    fn test_plan_timed_access_sets_expiry() {
        let now = Utc::now();
        let change =
            plan_access(&request("timed_access", Some("hours"), Some(2)), now, fixed_token)
                .unwrap();
        assert_eq!(change.access_type, AccessType::TimedAccess);
        assert_eq!(change.expiry_time, Some(now + Duration::hours(2)));
        assert!(change.share_token.is_some());
    }

    #[test]
    fn test_plan_rejects_invalid_input() {
        let now = Utc::now();
        let cases = [
            request("public", None, None),
            request("timed_access", None, Some(1)),
            request("timed_access", Some("weeks"), Some(1)),
            request("timed_access", Some("minutes"), None),
            request("timed_access", Some("minutes"), Some(0)),
            request("timed_access", Some("days"), Some(-3)),
            request("timed_access", Some("days"), Some(i64::MAX)),
        ];
        for case in cases {
            let err = plan_access(&case, now, fixed_token).unwrap_err();
            assert!(matches!(err, DriveError::InvalidInput(_)), "{case:?}");
        }
    }

    #[test]
    fn test_check_grant() {
        let now = Utc::now();
        let mut permission = Permission {
            file_id: 1,
            access_type: AccessType::AnyoneWithLink,
            share_token: Some("t".into()),
            expiry_time: None,
        };
        assert!(check_grant(&permission, now).is_ok());

        permission.access_type = AccessType::TimedAccess;
        permission.expiry_time = Some(now);
        assert!(check_grant(&permission, now).is_ok());
        assert!(matches!(
            check_grant(&permission, now + Duration::seconds(1)),
            Err(DriveError::LinkExpired(_))
        ));

        permission.access_type = AccessType::OnlyMe;
        assert!(matches!(
            check_grant(&permission, now),
            Err(DriveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_new_file_starts_only_me() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;

        let permission = storage
            .get_permission_by_file_id(file.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(permission.access_type, AccessType::OnlyMe);
        assert!(permission.share_token.is_none());
    }

    #[tokio::test]
    async fn test_anyone_with_link_resolves_and_counts() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage.clone());

        let permission = engine
            .set_access(file.id, owner, &request("anyone_with_link", None, None))
            .await
            .unwrap();
        let token = permission.share_token.unwrap();
        assert!(token.len() >= 43);

        let resolved = engine.resolve_by_token(&token).await.unwrap();
        assert_eq!(resolved.id, file.id);
        assert_eq!(resolved.download_count, file.download_count + 1);
    }

    #[tokio::test]
    async fn test_timed_access_expires_without_counting() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage.clone());
        let now = Utc::now();

        let permission = engine
            .set_access_at(
                file.id,
                owner,
                &request("timed_access", Some("minutes"), Some(1)),
                now,
            )
            .await
            .unwrap();
        assert!(permission.expiry_time.unwrap() > now);
        let token = permission.share_token.unwrap();

        let granted = engine.resolve_by_token_at(&token, now).await.unwrap();
        assert_eq!(granted.download_count, 1);

        let err = engine
            .resolve_by_token_at(&token, now + Duration::minutes(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::LinkExpired(_)));

        let after = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(after.download_count, 1);

        // 过期不改变状态
        let stored = storage
            .get_permission_by_file_id(file.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.access_type, AccessType::TimedAccess);
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_and_nothing_changes() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let intruder = test_support::user(&storage, "intruder@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage.clone());

        let before = storage
            .get_permission_by_file_id(file.id)
            .await
            .unwrap()
            .unwrap();

        let err = engine
            .set_access(file.id, intruder, &request("anyone_with_link", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::Forbidden(_)));

        let after = storage
            .get_permission_by_file_id(file.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let engine = AccessControl::new(storage);

        let err = engine
            .set_access(404, owner, &request("only_me", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));

        let err = engine.resolve_by_token("missing").await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_regenerated_link_invalidates_previous_token() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage);
        let anyone = request("anyone_with_link", None, None);

        let first = engine
            .set_access(file.id, owner, &anyone)
            .await
            .unwrap()
            .share_token
            .unwrap();
        let second = engine
            .set_access(file.id, owner, &anyone)
            .await
            .unwrap()
            .share_token
            .unwrap();
        assert_ne!(first, second);

        let err = engine.resolve_by_token(&first).await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));
        assert!(engine.resolve_by_token(&second).await.is_ok());
    }

    #[tokio::test]
    async fn test_only_me_revokes_link() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage);

        let token = engine
            .set_access(file.id, owner, &request("anyone_with_link", None, None))
            .await
            .unwrap()
            .share_token
            .unwrap();

        let permission = engine
            .set_access(file.id, owner, &request("only_me", None, None))
            .await
            .unwrap();
        assert!(permission.share_token.is_none());
        assert!(permission.expiry_time.is_none());

        let err = engine.resolve_by_token(&token).await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_orphaned_file_is_forbidden() {
        use crate::entity::users::Entity as Users;
        use crate::storage::sea_orm_storage::SeaOrmStorage;
        use sea_orm::EntityTrait;

        let sea = SeaOrmStorage::in_memory().await;
        let storage: Arc<dyn Storage> = Arc::new(sea.clone());
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;

        // 删除用户后文件保留，owner_id 置空
        Users::delete_by_id(owner).exec(&sea.db).await.unwrap();
        let orphan = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(orphan.owner_id, None);

        let engine = AccessControl::new(storage);
        let err = engine
            .set_access(file.id, owner, &request("anyone_with_link", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_link_revoked_after_authorize_is_not_counted() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage.clone());
        let anyone = request("anyone_with_link", None, None);

        let token = engine
            .set_access(file.id, owner, &anyone)
            .await
            .unwrap()
            .share_token
            .unwrap();
        let authorized = engine.authorize_token(&token).await.unwrap();
        assert_eq!(authorized.download_count, 0);

        // 校验通过后所有者收回链接
        engine
            .set_access(file.id, owner, &request("only_me", None, None))
            .await
            .unwrap();
        let err = engine.record_download(&token, file.id).await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));

        // 校验通过后所有者重新生成链接
        let fresh = engine
            .set_access(file.id, owner, &anyone)
            .await
            .unwrap()
            .share_token
            .unwrap();
        engine.authorize_token(&fresh).await.unwrap();
        engine.set_access(file.id, owner, &anyone).await.unwrap();
        let err = engine.record_download(&fresh, file.id).await.unwrap_err();
        assert!(matches!(err, DriveError::NotFound(_)));

        let after = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(after.download_count, 0);
    }

    #[tokio::test]
    async fn test_link_expiring_after_authorize_is_not_counted() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage.clone());
        let now = Utc::now();

        let token = engine
            .set_access_at(
                file.id,
                owner,
                &request("timed_access", Some("minutes"), Some(1)),
                now,
            )
            .await
            .unwrap()
            .share_token
            .unwrap();

        engine.authorize_token_at(&token, now).await.unwrap();
        let err = engine
            .record_download_at(&token, file.id, now + Duration::minutes(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::LinkExpired(_)));

        let after = storage.get_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(after.download_count, 0);
    }

    #[tokio::test]
    async fn test_timed_access_valid_until_exact_expiry() {
        let storage = test_support::storage().await;
        let owner = test_support::user(&storage, "owner@example.com").await;
        let file = test_support::file(&storage, owner, None).await;
        let engine = AccessControl::new(storage);
        // 带亚秒部分的当前时间
        let now = Utc::now()
            .with_nanosecond(750_000_000)
            .unwrap_or_else(Utc::now);

        let token = engine
            .set_access_at(
                file.id,
                owner,
                &request("timed_access", Some("minutes"), Some(1)),
                now,
            )
            .await
            .unwrap()
            .share_token
            .unwrap();

        let granted = engine
            .resolve_by_token_at(&token, now + Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(granted.download_count, 1);
    }
}
