use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::files::requests::UploadQuery;
use crate::models::permissions::requests::AccessRequest;
use crate::services::{FileService, SharingService};
use crate::utils::SafeIDI64;

pub async fn handle_upload(
    service: web::Data<FileService>,
    request: HttpRequest,
    query: web::Query<UploadQuery>,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    service
        .handle_upload(&request, query.into_inner(), payload)
        .await
}

pub async fn list_files(
    service: web::Data<FileService>,
    request: HttpRequest,
) -> ActixResult<HttpResponse> {
    service.list_files(&request).await
}

pub async fn handle_download(
    service: web::Data<FileService>,
    request: HttpRequest,
    file_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    service.handle_download(&request, file_id.0).await
}

pub async fn delete_file(
    service: web::Data<FileService>,
    request: HttpRequest,
    file_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    service.delete_file(&request, file_id.0).await
}

pub async fn set_access(
    service: web::Data<SharingService>,
    request: HttpRequest,
    file_id: SafeIDI64,
    body: web::Json<AccessRequest>,
) -> ActixResult<HttpResponse> {
    service
        .set_access(&request, file_id.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(handle_upload))
            .route("", web::get().to(list_files))
            .route("/{id}", web::get().to(handle_download))
            .route("/{id}", web::delete().to(delete_file))
            .route("/{id}/access", web::patch().to(set_access)),
    );
}
