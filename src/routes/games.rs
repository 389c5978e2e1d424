use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::models::dto::{GameInput, GameQuery, MessageResponse};
use crate::services::game_service::GameService;

/// GET /juegos?plataformaId=&categoriaId=
#[get("")]
pub async fn list_games(
    query: web::Query<GameQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let juegos = GameService::list(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(juegos))
}

#[get("/{id}")]
pub async fn get_game(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let juego = GameService::get(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(juego))
}

#[post("")]
pub async fn create_game(
    _admin: AdminUser,
    body: web::Json<GameInput>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let juego = GameService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(juego))
}

#[put("/{id}")]
pub async fn update_game(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<GameInput>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let juego = GameService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(juego))
}

#[delete("/{id}")]
pub async fn delete_game(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    GameService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Juego eliminado exitosamente",
    }))
}

pub fn games_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/juegos")
            .service(list_games)
            .service(create_game)
            .service(get_game)
            .service(update_game)
            .service(delete_game),
    );
}
