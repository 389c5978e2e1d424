use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Raison d'un refus 403
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    InvalidToken,
    InsufficientRole,
    Suspended,
}

impl ForbiddenReason {
    fn message(&self) -> &'static str {
        match self {
            ForbiddenReason::InvalidToken => "Token inválido",
            ForbiddenReason::InsufficientRole => "Acceso denegado",
            ForbiddenReason::Suspended => "Cuenta suspendida",
        }
    }
}

/// Erreur unique renvoyée par les handlers.
/// Le Display est le message exposé au client (toujours `{"message": ...}`).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    BadCredential(String),
    #[error("{}", .0.message())]
    Forbidden(ForbiddenReason),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Log la cause réelle et renvoie une 500 avec un message générique
    pub fn server(context: &'static str, cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "{}", context);
        Self::Internal(context.to_string())
    }

    /// Variante pour les erreurs de BD où une violation de contrainte a un sens métier
    pub fn from_db(context: &'static str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::conflict(context),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::conflict(context),
            _ => Self::server(context, err),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::server("Error interno del servidor", err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(first_validation_message(&errors))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::BadCredential(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
        })
    }
}

/// Premier message trouvé, par ordre alphabétique de champ pour rester déterministe
fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Datos inválidos".to_string())
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            format!("Datos inválidos: {}", e)
        }
        JsonPayloadError::Deserialize(_) => "JSON mal formado".to_string(),
        JsonPayloadError::ContentType => "Se esperaba Content-Type: application/json".to_string(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Cuerpo de la petición demasiado grande".to_string()
        }
        _ => "Cuerpo de la petición inválido".to_string(),
    };
    AppError::Validation(message).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Parámetros de consulta inválidos: {}", err)).into()
}

pub fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation("Identificador inválido").into()
}
