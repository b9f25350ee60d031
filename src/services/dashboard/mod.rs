use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user_id, error_response};
use crate::storage::Storage;

pub struct DashboardService {
    storage: Arc<dyn Storage>,
}

impl DashboardService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 当前用户的文件数、存储量与下载总数
    pub async fn summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user_id = match current_user_id(request) {
            Ok(id) => id,
            Err(response) => return Ok(response),
        };

        match self.storage.get_usage_summary(user_id).await {
            Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                summary,
                "Dashboard retrieved",
            ))),
            Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
        }
    }
}
