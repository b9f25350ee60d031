use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::folders::requests::{CreateFolderRequest, FolderListQuery, RenameFolderRequest};
use crate::services::FolderService;
use crate::utils::SafeIDI64;

pub async fn create_folder(
    service: web::Data<FolderService>,
    req: HttpRequest,
    body: web::Json<CreateFolderRequest>,
) -> ActixResult<HttpResponse> {
    service.create_folder(&req, body.into_inner()).await
}

pub async fn list_folders(
    service: web::Data<FolderService>,
    req: HttpRequest,
    query: web::Query<FolderListQuery>,
) -> ActixResult<HttpResponse> {
    service.list_folders(&req, query.into_inner()).await
}

pub async fn rename_folder(
    service: web::Data<FolderService>,
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<RenameFolderRequest>,
) -> ActixResult<HttpResponse> {
    service.rename_folder(&req, path.0, body.into_inner()).await
}

pub async fn delete_folder(
    service: web::Data<FolderService>,
    req: HttpRequest,
    path: SafeIDI64,
) -> ActixResult<HttpResponse> {
    service.delete_folder(&req, path.0).await
}

pub async fn list_folder_files(
    service: web::Data<FolderService>,
    req: HttpRequest,
    path: SafeIDI64,
) -> ActixResult<HttpResponse> {
    service.list_folder_files(&req, path.0).await
}

// 配置路由
pub fn configure_folder_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/folders")
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(create_folder))
            .route("", web::get().to(list_folders))
            .route("/{id}", web::patch().to(rename_folder))
            .route("/{id}", web::delete().to(delete_folder))
            .route("/{id}/files", web::get().to(list_folder_files)),
    );
}
