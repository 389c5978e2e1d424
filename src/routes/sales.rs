use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{RecordSalesRequest, RecordSalesResponse};
use crate::services::sale_service::SaleService;

/// POST /ventas - Enregistre le panier (tout ou rien)
/// Chaque ligne doit appartenir à l'appelant, sauf pour un ADMIN
#[post("")]
pub async fn record_sales(
    auth_user: AuthUser,
    body: web::Json<RecordSalesRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let result = SaleService::record(
        db.get_ref(),
        auth_user.user_id,
        auth_user.rol,
        body.into_inner().ventas,
    )
    .await?;

    info!(user_id = auth_user.user_id, lines = result.len(), "checkout completed");
    Ok(HttpResponse::Created().json(RecordSalesResponse {
        message: "Ventas registradas correctamente",
        result,
    }))
}

pub fn sales_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/ventas").service(record_sales));
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::models::users::Rol;
    use crate::test_support::{bearer, seed_catalog, seed_game, seed_user, setup_db, test_app};

    #[actix_web::test]
    async fn test_checkout() {
        let db = setup_db().await;
        let user = seed_user(&db, "ana", "ana@example.com", "secreto1", Rol::User, true).await;
        let catalog = seed_catalog(&db).await;
        let game = seed_game(&db, "Hades", catalog.categorias[0]).await;
        let app = test_app!(db);

        let payload = json!({
            "ventas": [{
                "fecha": "2024-05-01T12:00:00Z",
                "usuarioid": user.id,
                "juegoid": game.id,
                "monto_pagado": "24.99",
            }]
        });

        let req = test::TestRequest::post()
            .uri("/api/ventas")
            .set_json(&payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/ventas")
            .insert_header(bearer(user.id, Rol::User))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Ventas registradas correctamente");
        assert_eq!(body["result"][0]["juegoId"], game.id);
        assert_eq!(body["result"][0]["codigo"].as_str().unwrap().len(), 32);
    }

    #[actix_web::test]
    async fn test_checkout_for_another_account_is_forbidden() {
        let db = setup_db().await;
        let ana = seed_user(&db, "ana", "ana@example.com", "secreto1", Rol::User, true).await;
        let eve = seed_user(&db, "eve", "eve@example.com", "secreto1", Rol::User, true).await;
        let catalog = seed_catalog(&db).await;
        let game = seed_game(&db, "Hades", catalog.categorias[0]).await;
        let app = test_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/ventas")
            .insert_header(bearer(eve.id, Rol::User))
            .set_json(json!({
                "ventas": [{
                    "fecha": "2024-05-01T12:00:00Z",
                    "usuarioid": ana.id,
                    "juegoid": game.id,
                    "monto_pagado": "0",
                }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Acceso denegado");
        assert!(body.get("result").is_none());
    }

    #[actix_web::test]
    async fn test_empty_or_malformed_cart() {
        let db = setup_db().await;
        let app = test_app!(db);

        for payload in [json!({}), json!({"ventas": []}), json!({"ventas": "nada"})] {
            let req = test::TestRequest::post()
                .uri("/api/ventas")
                .insert_header(bearer(1, Rol::User))
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        }
    }

    #[actix_web::test]
    async fn test_client_code_rejected() {
        let db = setup_db().await;
        let app = test_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/ventas")
            .insert_header(bearer(1, Rol::User))
            .set_json(json!({
                "ventas": [{
                    "fecha": "2024-05-01T12:00:00Z",
                    "usuarioid": 1,
                    "juegoid": 1,
                    "monto_pagado": "10",
                    "codigo": "elegido-por-el-cliente",
                }]
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
