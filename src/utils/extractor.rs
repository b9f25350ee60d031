use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};
use crate::utils::random_code::SHARE_TOKEN_LENGTH;

fn bad_request(message: &str) -> actix_web::Error {
    InternalError::from_response(
        message.to_string(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 路径参数 `{id}`，必须为正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0);

        ready(match parsed {
            Some(id) => Ok(SafeIDI64(id)),
            None => Err(bad_request("Invalid id in path")),
        })
    }
}

/// 路径参数 `{token}`，只允许字母数字，长度与生成的分享 token 一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeShareToken(pub String);

impl FromRequest for SafeShareToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req.match_info().get("token").unwrap_or_default();

        ready(
            if token.len() == SHARE_TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
            {
                Ok(SafeShareToken(token.to_string()))
            } else {
                // 格式不合法的 token 不可能存在，按未找到处理
                Err(InternalError::from_response(
                    "share link not found".to_string(),
                    HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::ShareLinkNotFound,
                        "Share link not found",
                    )),
                )
                .into())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(42));
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_garbage() {
        for raw in ["abc", "-1", "0", ""] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err());
        }
    }

    #[actix_web::test]
    async fn test_share_token_shape() {
        let token = "a".repeat(SHARE_TOKEN_LENGTH);
        let req = TestRequest::default().param("token", token.clone()).to_http_request();
        assert_eq!(SafeShareToken::extract(&req).await.unwrap().0, token);

        let req = TestRequest::default().param("token", "../etc").to_http_request();
        assert!(SafeShareToken::extract(&req).await.is_err());
    }
}
