pub mod login;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;
use crate::utils::{CredentialStore, TokenIssuer};

pub struct AuthService {
    storage: Arc<dyn Storage>,
    credentials: CredentialStore,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, credentials: CredentialStore, tokens: TokenIssuer) -> Self {
        Self {
            storage,
            credentials,
            tokens,
        }
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: crate::models::auth::LoginRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request).await
    }

    // 用户注册
    pub async fn register(
        &self,
        create_request: crate::models::users::requests::CreateUserRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, create_request).await
    }

    // 获取用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }
}
