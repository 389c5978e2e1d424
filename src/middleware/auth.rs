use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{AppError, ForbiddenReason};
use crate::models::users::Rol;
use crate::utils::jwt;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub rol: Rol,
    pub estado: bool,
}

/// Même chose mais exige le rôle ADMIN
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req).and_then(|user| {
            if user.rol == Rol::Admin {
                Ok(AdminUser(user))
            } else {
                Err(AppError::Forbidden(ForbiddenReason::InsufficientRole))
            }
        });
        ready(result)
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| AppError::server("Error de configuración", "AppConfig missing from app_data"))?;

    // 1. Extraire le token (format: "Bearer <token>")
    let token = bearer_token(req)
        .ok_or_else(|| AppError::Unauthenticated("Token requerido".to_string()))?;

    // 2. Vérifier le token JWT (signature + expiration)
    let claims = jwt::verify_token(token, &config.jwt_secret)
        .map_err(|_| AppError::Forbidden(ForbiddenReason::InvalidToken))?;

    Ok(AuthUser {
        user_id: claims.sub,
        rol: claims.rol,
        estado: claims.estado,
    })
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
