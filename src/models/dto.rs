//pour les requêtes entrantes et les réponses structurées
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::users::Rol;
use super::{games, images, news, news_images, platforms, sales, users};

// ----------------------------------------------------------------------------
// Auth
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// Email OU nom d'utilisateur
    #[validate(length(min = 1, message = "Correo y contraseña son requeridos"))]
    pub correo: String,
    #[validate(length(min = 1, message = "Correo y contraseña son requeridos"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub nombre: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,
    #[validate(email(message = "Correo no válido"))]
    pub correo: String,
    pub estado: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Correo es requerido"))]
    pub correo: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    #[validate(length(min = 1, message = "Correo es requerido"))]
    pub correo: String,
    #[validate(length(min = 1, message = "El código de verificación es requerido"))]
    pub verification_code: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Correo y nuevas contraseñas son requeridos"))]
    pub correo: String,
    #[validate(length(min = 1, message = "El código de verificación es requerido"))]
    pub verification_code: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Infos publiques renvoyées au login
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub nombre: String,
    pub correo: String,
    pub rol: Rol,
}

impl From<&users::Model> for UserSummary {
    fn from(user: &users::Model) -> Self {
        UserSummary {
            id: user.id,
            nombre: user.nombre.clone(),
            correo: user.correo.clone(),
            rol: user.rol,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserSummary,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: users::Model,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: i32,
    pub rol: Rol,
    pub estado: bool,
}

/// Ligne de GET /api/usuarios
#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub id: i32,
    pub correo: String,
    pub nombre: String,
    pub estado: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ----------------------------------------------------------------------------
// Catalogue
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageInput {
    pub url: String,
    #[serde(default)]
    pub descripcion: String,
}

fn positive_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive");
        err.message = Some("El precio debe ser mayor a 0".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GameInput {
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub nombre: String,
    #[validate(custom(function = "positive_price"))]
    pub precio: Decimal,
    #[serde(default)]
    pub esta_oferta: bool,
    #[serde(default = "default_true")]
    pub estado: bool,
    #[validate(range(min = 1, message = "La categoría es requerida"))]
    pub categoria_id: i32,
    #[serde(default)]
    pub imagenes: Vec<ImageInput>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub plataformas: Vec<i32>,
}

fn default_true() -> bool {
    true
}

/// Filtres de GET /api/juegos (0 ou absent = pas de filtre)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GameQuery {
    pub plataforma_id: Option<i32>,
    pub categoria_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub juego: games::Model,
    pub imagenes: Vec<images::Model>,
    pub plataformas: Vec<platforms::Model>,
}

// ----------------------------------------------------------------------------
// Ventes
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaleLineInput {
    pub fecha: DateTime<Utc>,
    pub usuarioid: i32,
    pub juegoid: i32,
    pub monto_pagado: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSalesRequest {
    #[serde(default)]
    pub ventas: Option<Vec<SaleLineInput>>,
}

#[derive(Debug, Serialize)]
pub struct RecordSalesResponse {
    pub message: &'static str,
    pub result: Vec<sales::Model>,
}

// ----------------------------------------------------------------------------
// Actualités
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewsInput {
    #[validate(length(min = 1, message = "El título es requerido"))]
    pub titulo: String,
    #[validate(length(min = 1, message = "El contenido es requerido"))]
    pub contenido: String,
    #[serde(default)]
    pub imagenes: Vec<ImageInput>,
}

#[derive(Debug, Serialize)]
pub struct NewsDetail {
    #[serde(flatten)]
    pub noticia: news::Model,
    pub imagenes: Vec<news_images::Model>,
}
