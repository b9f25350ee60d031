/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <token>` 请求头，通过后把当前用户写入请求扩展。
 *
 * ```rust,ignore
 * use actix_web::{web, HttpRequest, HttpResponse, Result};
 * use crate::middlewares::RequireJWT;
 *
 * async fn protected_handler(req: HttpRequest) -> Result<HttpResponse> {
 *     if let Some(user_id) = RequireJWT::extract_user_id(&req) {
 *         return Ok(HttpResponse::Ok().json(format!("User ID: {}", user_id)));
 *     }
 *     Ok(HttpResponse::Unauthorized().finish())
 * }
 *
 * web::scope("/api")
 *     .wrap(RequireJWT)
 *     .route("/protected", web::get().to(protected_handler));
 * ```
 *
 * ## 认证流程
 *
 * 1. 从请求头提取 token，交给 `TokenIssuer` 校验签名和过期时间
 * 2. 按 token 查询缓存中的用户，未命中时回源数据库并写入缓存
 * 3. 用户不存在或 token 无效时返回 401，过期时返回 `Token expired`
 *
 * 依赖的 `TokenIssuer`、`Arc<dyn ObjectCache>`、`Arc<dyn Storage>` 需要在启动时注册为 `app_data`。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::models::{ApiResponse, ErrorCode, users::entities};
use crate::storage::Storage;
use crate::utils::{TokenError, TokenIssuer};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 认证失败原因
enum AuthFailure {
    Unauthorized(String),
    Expired,
    Internal(String),
}

// 辅助函数：创建错误响应
fn create_error_response(failure: &AuthFailure) -> HttpResponse {
    let (status, code, message) = match failure {
        AuthFailure::Unauthorized(reason) => (
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            format!("Unauthorized: {reason}"),
        ),
        AuthFailure::Expired => (
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenExpired,
            "Token expired".to_string(),
        ),
        AuthFailure::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Internal server error".to_string(),
        ),
    };

    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

fn app_data<T: ?Sized + 'static>(req: &ServiceRequest, name: &str) -> Result<Arc<T>, AuthFailure> {
    req.app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal(format!("{name} not found in app data")))
}

// 辅助函数：提取并验证 JWT access token
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<entities::User, AuthFailure> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            AuthFailure::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AuthFailure::Internal("TokenIssuer not found in app data".to_string()))?;

    let user_id = issuer.verify(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        match err {
            TokenError::Expired => AuthFailure::Expired,
            TokenError::Invalid(_) => AuthFailure::Unauthorized("Invalid JWT token".to_string()),
        }
    })?;

    let cache = app_data::<dyn ObjectCache>(req, "Cache")?;
    let cache_key = format!("user:{token}");

    // 从缓存中获取用户信息
    match cache.get_raw(&cache_key).await {
        CacheResult::Found(json) => match serde_json::from_str::<entities::User>(&json) {
            Ok(user) if user.id == user_id => return Ok(user),
            _ => {
                cache.remove(&cache_key).await;
                info!("Discarded stale cached user for token");
            }
        },
        _ => {
            debug!("User not found in cache, loading user {}", user_id);
        }
    };

    let storage = app_data::<dyn Storage>(req, "Storage")?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|err| AuthFailure::Internal(err.to_string()))?
        .ok_or_else(|| AuthFailure::Unauthorized("User not found".to_string()))?;

    // 将用户信息存入缓存（使用缓存的全局 TTL）
    if let Ok(user_json) = serde_json::to_string(&user) {
        cache.insert_raw(cache_key, user_json, 0).await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    match &failure {
                        AuthFailure::Internal(reason) => error!(
                            "JWT authentication error for request to {}: {}",
                            req.path(),
                            reason
                        ),
                        _ => info!("JWT authentication failed for request to {}", req.path()),
                    }
                    Ok(req.into_response(create_error_response(&failure).map_into_right_body()))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    /// 从请求扩展中提取用户ID
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }
}
