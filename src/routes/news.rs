use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::models::dto::{MessageResponse, NewsInput};
use crate::services::news_service::NewsService;

#[get("")]
pub async fn list_news(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let noticias = NewsService::list(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(noticias))
}

#[get("/{id}")]
pub async fn get_news(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let noticia = NewsService::get(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(noticia))
}

#[post("")]
pub async fn create_news(
    _admin: AdminUser,
    body: web::Json<NewsInput>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let noticia = NewsService::create(db.get_ref(), body.into_inner(), Utc::now()).await?;
    Ok(HttpResponse::Created().json(noticia))
}

#[put("/{id}")]
pub async fn update_news(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<NewsInput>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let noticia = NewsService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(noticia))
}

#[delete("/{id}")]
pub async fn delete_news(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    NewsService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Noticia eliminada exitosamente",
    }))
}

pub fn news_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/noticias")
            .service(list_news)
            .service(create_news)
            .service(get_news)
            .service(update_news)
            .service(delete_news),
    );
}
