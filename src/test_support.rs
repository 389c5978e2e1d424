// Outils partagés par les tests: BD SQLite en mémoire, données de base, mailer factice

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::*;

use crate::config::AppConfig;
use crate::db;
use crate::models::users::{self, Rol};
use crate::models::{categories, games, platforms};
use crate::services::mailer::{MailError, Mailer};
use crate::utils::password;

pub const TEST_SECRET: &str = "test-secret-nivel100";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 3000,
        jwt_secret: TEST_SECRET.to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        sync_schema: true,
        mail: None,
    }
}

/// Une seule connexion: chaque connexion sqlite::memory: aurait sa propre base
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = Database::connect(options).await.unwrap();
    db::sync_schema(&conn).await.unwrap();
    conn
}

pub async fn seed_user(
    db: &DatabaseConnection,
    nombre: &str,
    correo: &str,
    plaintext: &str,
    rol: Rol,
    estado: bool,
) -> users::Model {
    users::ActiveModel {
        nombre: Set(nombre.to_string()),
        correo: Set(correo.to_string()),
        password: Set(password::hash_password(plaintext).unwrap()),
        rol: Set(rol),
        estado: Set(estado),
        token: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub struct Catalog {
    pub categorias: Vec<i32>,
    pub plataformas: Vec<i32>,
}

/// 2 catégories, 4 plateformes
pub async fn seed_catalog(db: &DatabaseConnection) -> Catalog {
    let mut categorias = Vec::new();
    for nombre in ["Acción", "RPG"] {
        let categoria = categories::ActiveModel {
            nombre: Set(nombre.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        categorias.push(categoria.id);
    }

    let mut plataformas = Vec::new();
    for nombre in ["PC", "PS5", "Xbox", "Switch"] {
        let plataforma = platforms::ActiveModel {
            nombre: Set(nombre.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        plataformas.push(plataforma.id);
    }

    Catalog { categorias, plataformas }
}

pub async fn seed_game(db: &DatabaseConnection, nombre: &str, categoria_id: i32) -> games::Model {
    games::ActiveModel {
        nombre: Set(nombre.to_string()),
        precio: Set(Decimal::new(2999, 2)),
        esta_oferta: Set(false),
        estado: Set(true),
        categoria_id: Set(categoria_id),
        video_url: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Garde (destinataire, code) au lieu d'envoyer
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last(&self) -> Option<(String, String)> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), code.to_string()));
        Ok(())
    }
}

/// Header Authorization signé avec le secret de test
pub fn bearer(user_id: i32, rol: Rol) -> (&'static str, String) {
    let token = crate::utils::jwt::generate_token(user_id, rol, true, TEST_SECRET, chrono::Utc::now())
        .unwrap();
    ("Authorization", format!("Bearer {}", token))
}

/// Service actix complet (routes + app_data) sur la BD donnée.
/// Le second argument optionnel est un `Arc<dyn Mailer>`.
macro_rules! test_app {
    ($db:expr) => {
        $crate::test_support::test_app!(
            $db,
            std::sync::Arc::new($crate::services::mailer::LogMailer)
        )
    };
    ($db:expr, $mailer:expr) => {{
        let mailer: std::sync::Arc<dyn $crate::services::mailer::Mailer> = $mailer;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($db.clone()))
                .app_data(actix_web::web::Data::new($crate::test_support::test_config()))
                .app_data(actix_web::web::Data::from(mailer))
                .configure($crate::routes::configure_routes),
        )
        .await
    }};
}
pub(crate) use test_app;
