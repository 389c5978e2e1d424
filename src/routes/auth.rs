use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MeResponse, MessageResponse,
    ResetPasswordRequest, SignupRequest, SignupResponse, UserSummary, VerifyCodeRequest,
};
use crate::services::auth_service::AuthService;
use crate::services::mailer::Mailer;
use crate::utils::verification::CodeCheck;

/// POST /auth/login - Se connecter avec email ou nom d'utilisateur (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let (user, token) = AuthService::authenticate(
        db.get_ref(),
        &config.jwt_secret,
        &body.correo,
        &body.password,
        Utc::now(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Login exitoso",
        user: UserSummary::from(&user),
        token,
    }))
}

/// POST /auth/signup - Créer un compte USER (PUBLIC)
#[post("/signup")]
pub async fn signup(
    body: web::Json<SignupRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let user = AuthService::signup(db.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Created().json(SignupResponse {
        success: true,
        message: "Usuario registrado exitosamente",
        user,
    }))
}

/// GET /auth/me - Vérifier le token (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user_id: auth_user.user_id,
        rol: auth_user.rol,
        estado: auth_user.estado,
    })
}

/// POST /auth/forgot-password - Envoie un code de vérification par email (PUBLIC)
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    mailer: web::Data<dyn Mailer>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    AuthService::issue_verification_code(
        db.get_ref(),
        mailer.get_ref(),
        &config.jwt_secret,
        &body.correo,
        Utc::now(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Se ha enviado un código de verificación al correo",
    }))
}

/// POST /auth/verify-code - Vérifie le code sans le consommer (PUBLIC)
#[post("/verify-code")]
pub async fn verify_code(
    body: web::Json<VerifyCodeRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let check = AuthService::validate_verification_code(
        db.get_ref(),
        &config.jwt_secret,
        &body.correo,
        &body.verification_code,
        Utc::now(),
    )
    .await?;

    match check {
        CodeCheck::Valid => Ok(HttpResponse::Ok().json(MessageResponse {
            message: "Código verificado correctamente",
        })),
        CodeCheck::Invalid => Err(AppError::validation("Código de verificación inválido")),
        CodeCheck::Expired => Err(AppError::validation("El código de verificación ha expirado")),
    }
}

/// POST /auth/reset-password - Nouveau mot de passe avec le code reçu (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    AuthService::reset_password(db.get_ref(), &config.jwt_secret, body.into_inner(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Contraseña actualizada con éxito",
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(login)
            .service(signup)
            .service(me)
            .service(forgot_password)
            .service(verify_code)
            .service(reset_password),
    );
}
