use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::domain::{AccessControl, FolderTree};
use crate::services::{
    AuthService, DashboardService, FileService, FolderService, SharingService,
};
use crate::storage::Storage;
use crate::utils::{CredentialStore, TokenIssuer};

/// 启动阶段构造的共享状态，全部以 `web::Data` 注入
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub tokens: TokenIssuer,
    pub auth: AuthService,
    pub folders: FolderService,
    pub files: FileService,
    pub sharing: SharingService,
    pub dashboard: DashboardService,
}

/// 确保上传根目录存在
fn prepare_upload_dir(config: &AppConfig) -> std::io::Result<()> {
    let dir = std::path::Path::new(&config.upload.dir);
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        warn!("Created upload directory: {}", dir.display());
    }
    Ok(())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、凭据与各业务服务
pub async fn prepare_server_startup(
    config: &AppConfig,
) -> Result<StartupContext, Box<dyn std::error::Error>> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(&config.cache));
    warn!("Cache backend initialized");

    prepare_upload_dir(config)?;

    let tokens = TokenIssuer::new(&config.jwt);
    let credentials = CredentialStore::new(&config.argon2)?;
    debug!(
        "Access tokens expire after {} seconds",
        tokens.access_token_ttl_secs()
    );

    let auth = AuthService::new(storage.clone(), credentials, tokens.clone());
    let folders = FolderService::new(FolderTree::new(storage.clone()));
    let files = FileService::new(storage.clone(), config.upload.clone());
    let sharing = SharingService::new(AccessControl::new(storage.clone()));
    let dashboard = DashboardService::new(storage.clone());

    Ok(StartupContext {
        storage,
        cache,
        tokens,
        auth,
        folders,
        files,
        sharing,
        dashboard,
    })
}
