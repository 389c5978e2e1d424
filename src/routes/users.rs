use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::error::AppError;
use crate::models::dto::UserListItem;
use crate::models::users::{self, Entity as Users};

/// GET /usuarios - Liste publique (sans mot de passe ni token)
#[get("")]
pub async fn list_users(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let usuarios: Vec<UserListItem> = Users::find()
        .order_by_asc(users::Column::Id)
        .all(db.get_ref())
        .await
        .map_err(|e| AppError::server("Error al obtener los usuarios", e))?
        .into_iter()
        .map(|u| UserListItem {
            id: u.id,
            correo: u.correo,
            nombre: u.nombre,
            estado: u.estado,
        })
        .collect();

    if usuarios.is_empty() {
        return Err(AppError::not_found("No hay usuarios disponibles"));
    }

    Ok(HttpResponse::Ok().json(usuarios))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/usuarios").service(list_users));
}
