use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::services::SharingService;
use crate::utils::SafeShareToken;

// 公开路由，无需登录
pub async fn resolve_share(
    service: web::Data<SharingService>,
    token: SafeShareToken,
) -> ActixResult<HttpResponse> {
    service.resolve(token.0).await
}

// 配置路由
pub fn configure_share_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/share").route("/{token}", web::get().to(resolve_share)));
}
