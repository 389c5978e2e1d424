use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::models::health::HealthResponse;

#[get("/health")]
pub async fn health_check(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let database = match db.ping().await {
        Ok(()) => "up",
        Err(e) => {
            warn!(error = %e, "health check: database unreachable");
            "down"
        }
    };

    let response = HealthResponse {
        status: if database == "up" { "ok" } else { "degraded" },
        database,
        time: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}
