use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{AppError, ForbiddenReason};
use crate::models::dto::{ResetPasswordRequest, SignupRequest};
use crate::models::users::{self, Entity as Users, Rol};
use crate::services::mailer::Mailer;
use crate::utils::verification::{self, CodeCheck};
use crate::utils::{jwt, password};

/// Échecs possibles d'une tentative de connexion
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Usuario no encontrado")]
    NotFound,
    #[error("Contraseña incorrecta")]
    BadCredential,
    #[error("Cuenta suspendida")]
    Suspended,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFound => AppError::not_found(err.to_string()),
            AuthError::BadCredential => AppError::BadCredential(err.to_string()),
            AuthError::Suspended => AppError::Forbidden(ForbiddenReason::Suspended),
        }
    }
}

const EMAIL_TAKEN: &str = "El correo electrónico ya está registrado";
const NAME_TAKEN: &str = "El nombre de usuario ya está registrado";

pub struct AuthService;

impl AuthService {
    /// Cherche un compte par email OU nom d'utilisateur (le plus petit id gagne si les deux existent)
    pub async fn find_by_identifier<C: ConnectionTrait>(
        db: &C,
        identifier: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::Correo.eq(identifier))
                    .add(users::Column::Nombre.eq(identifier)),
            )
            .order_by_asc(users::Column::Id)
            .one(db)
            .await
    }

    /// Login: retourne le compte et un JWT de session (1h)
    /// Un compte suspendu est refusé avant même la vérification du mot de passe
    pub async fn authenticate(
        db: &DatabaseConnection,
        secret: &str,
        identifier: &str,
        plaintext: &str,
        now: DateTime<Utc>,
    ) -> Result<(users::Model, String), AppError> {
        let user = Self::find_by_identifier(db, identifier)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !user.estado {
            return Err(AuthError::Suspended.into());
        }

        let matches = verify_off_thread(plaintext.to_string(), user.password.clone()).await?;
        if !matches {
            return Err(AuthError::BadCredential.into());
        }

        let token = jwt::generate_token(user.id, user.rol, user.estado, secret, now)
            .map_err(|e| AppError::server("Error al iniciar sesión", e))?;

        Ok((user, token))
    }

    /// Crée un compte USER. Email puis nom doivent être libres.
    pub async fn signup(
        db: &DatabaseConnection,
        request: SignupRequest,
    ) -> Result<users::Model, AppError> {
        request.validate()?;

        let email_taken = Users::find()
            .filter(users::Column::Correo.eq(&request.correo))
            .one(db)
            .await?
            .is_some();
        if email_taken {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let name_taken = Users::find()
            .filter(users::Column::Nombre.eq(&request.nombre))
            .one(db)
            .await?
            .is_some();
        if name_taken {
            return Err(AppError::conflict(NAME_TAKEN));
        }

        let password_hash = hash_off_thread(request.password).await?;

        let new_user = users::ActiveModel {
            nombre: Set(request.nombre),
            correo: Set(request.correo),
            password: Set(password_hash),
            rol: Set(Rol::User),
            estado: Set(request.estado),
            token: Set(None),
            ..Default::default()
        };

        // Deux inscriptions simultanées peuvent passer les vérifications ci-dessus
        new_user.insert(db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("nombre") => {
                AppError::conflict(NAME_TAKEN)
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(EMAIL_TAKEN),
            _ => AppError::server("Error al registrar el usuario", e),
        })
    }

    /// Génère un nouveau code, le stocke signé sur le compte puis l'envoie par email.
    /// Écrase tout code encore en attente.
    pub async fn issue_verification_code(
        db: &DatabaseConnection,
        mailer: &dyn Mailer,
        secret: &str,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let user = Self::find_by_identifier(db, identifier)
            .await?
            .ok_or(AuthError::NotFound)?;

        let code = verification::generate_code();
        let token = verification::issue_token(&code, now, secret)
            .map_err(|e| AppError::server("Error al procesar la solicitud de restablecimiento", e))?;

        let correo = user.correo.clone();
        let mut active_model: users::ActiveModel = user.into();
        active_model.token = Set(Some(token));
        let user = active_model.update(db).await?;

        mailer
            .send_verification_code(&correo, &code)
            .await
            .map_err(|e| AppError::server("Error al enviar el correo", e))?;

        info!(user_id = user.id, "verification code issued");
        Ok(())
    }

    pub async fn validate_verification_code(
        db: &DatabaseConnection,
        secret: &str,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<CodeCheck, AppError> {
        let user = Self::find_by_identifier(db, identifier)
            .await?
            .ok_or(AuthError::NotFound)?;

        Ok(verification::check_code(user.token.as_deref(), code, now, secret))
    }

    /// Remplace le mot de passe si le code est valide puis consomme le code
    pub async fn reset_password(
        db: &DatabaseConnection,
        secret: &str,
        request: ResetPasswordRequest,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if request.new_password != request.confirm_new_password {
            return Err(AppError::validation("Las contraseñas no coinciden"));
        }
        request.validate()?;

        let user = Self::find_by_identifier(db, &request.correo)
            .await?
            .ok_or(AuthError::NotFound)?;

        match verification::check_code(user.token.as_deref(), &request.verification_code, now, secret) {
            CodeCheck::Valid => {}
            CodeCheck::Invalid => return Err(invalid_code()),
            CodeCheck::Expired => {
                return Err(AppError::validation("El código de verificación ha expirado"));
            }
        }

        let password_hash = hash_off_thread(request.new_password).await?;

        // Mise à jour conditionnelle: si le token a changé entre temps, le code n'est plus le bon
        let result = Users::update_many()
            .col_expr(users::Column::Password, Expr::value(password_hash))
            .col_expr(users::Column::Token, Expr::value(Option::<String>::None))
            .filter(users::Column::Id.eq(user.id))
            .filter(users::Column::Token.eq(user.token.clone()))
            .exec(db)
            .await?;

        if result.rows_affected != 1 {
            warn!(user_id = user.id, "verification code consumed concurrently");
            return Err(invalid_code());
        }

        info!(user_id = user.id, "password reset");
        Ok(())
    }
}

fn invalid_code() -> AppError {
    AppError::validation("Código de verificación inválido")
}

async fn hash_off_thread(plaintext: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| AppError::server("Error al procesar la contraseña", e))?
        .map_err(|e| AppError::server("Error al procesar la contraseña", e))
}

async fn verify_off_thread(plaintext: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
        .await
        .map_err(|e| AppError::server("Error al iniciar sesión", e))?
        .map_err(|e| AppError::server("Error al iniciar sesión", e))
}
