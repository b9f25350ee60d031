use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::services::DashboardService;

pub async fn get_dashboard(
    service: web::Data<DashboardService>,
    request: HttpRequest,
) -> ActixResult<HttpResponse> {
    service.summary(&request).await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_dashboard)),
    );
}
