// Tables de référence en lecture seule

use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::error::AppError;
use crate::models::{categories, platforms};

#[get("/categorias")]
pub async fn list_categories(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let categorias = categories::Entity::find()
        .order_by_asc(categories::Column::Id)
        .all(db.get_ref())
        .await
        .map_err(|e| AppError::server("Error al obtener las categorías", e))?;

    Ok(HttpResponse::Ok().json(categorias))
}

#[get("/plataformas")]
pub async fn list_platforms(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let plataformas = platforms::Entity::find()
        .order_by_asc(platforms::Column::Id)
        .all(db.get_ref())
        .await
        .map_err(|e| AppError::server("Error al obtener las plataformas", e))?;

    Ok(HttpResponse::Ok().json(plataformas))
}

pub fn catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_categories).service(list_platforms);
}
