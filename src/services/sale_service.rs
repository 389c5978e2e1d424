use rand::rngs::OsRng;
use rand::RngCore;
use rust_decimal::Decimal;
use sea_orm::*;
use tracing::{info, warn};

use crate::error::{AppError, ForbiddenReason};
use crate::models::dto::SaleLineInput;
use crate::models::sales;
use crate::models::users::Rol;

const SALE_CODE_BYTES: usize = 16;

/// Code d'activation unique par ligne (32 caractères hex)
pub fn generate_sale_code() -> String {
    let mut bytes = [0u8; SALE_CODE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub struct SaleService;

impl SaleService {
    /// Enregistre tout le panier ou rien.
    /// Un USER n'achète que pour son propre compte, un ADMIN pour n'importe lequel.
    pub async fn record(
        db: &DatabaseConnection,
        buyer_id: i32,
        buyer_rol: Rol,
        lines: Option<Vec<SaleLineInput>>,
    ) -> Result<Vec<sales::Model>, AppError> {
        let lines = match lines {
            Some(lines) if !lines.is_empty() => lines,
            _ => return Err(AppError::validation("No hay ventas para registrar")),
        };

        if buyer_rol != Rol::Admin && lines.iter().any(|line| line.usuarioid != buyer_id) {
            warn!(buyer_id, "sale lines submitted for another account");
            return Err(AppError::Forbidden(ForbiddenReason::InsufficientRole));
        }

        if lines.iter().any(|line| line.monto_pagado < Decimal::ZERO) {
            return Err(AppError::validation("El monto pagado no puede ser negativo"));
        }

        let persisted = Self::insert_all(db, &lines)
            .await
            .map_err(|e| AppError::server("Error al registrar ventas", e))?;

        info!(count = persisted.len(), "sales recorded");
        Ok(persisted)
    }

    async fn insert_all(
        db: &DatabaseConnection,
        lines: &[SaleLineInput],
    ) -> Result<Vec<sales::Model>, DbErr> {
        let txn = db.begin().await?;

        let mut persisted = Vec::with_capacity(lines.len());
        for line in lines {
            let sale = sales::ActiveModel {
                fecha: Set(line.fecha),
                usuario_id: Set(line.usuarioid),
                juego_id: Set(line.juegoid),
                codigo: Set(generate_sale_code()),
                monto_pagado: Set(line.monto_pagado),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            persisted.push(sale);
        }

        // Un drop sans commit annule toute la transaction
        txn.commit().await?;
        Ok(persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    use crate::models::users::Rol;
    use crate::test_support::{seed_catalog, seed_game, seed_user, setup_db};

    fn line(usuarioid: i32, juegoid: i32, cents: i64) -> SaleLineInput {
        SaleLineInput {
            fecha: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            usuarioid,
            juegoid,
            monto_pagado: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_sale_code_format() {
        let code = generate_sale_code();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(code, generate_sale_code());
    }

    #[actix_web::test]
    async fn test_empty_cart_rejected() {
        let db = setup_db().await;

        let err = SaleService::record(&db, 1, Rol::User, None).await.unwrap_err();
        assert_eq!(err.to_string(), "No hay ventas para registrar");

        let err = SaleService::record(&db, 1, Rol::User, Some(vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[actix_web::test]
    async fn test_negative_amount_rejected() {
        let db = setup_db().await;
        let user = seed_user(&db, "ana", "ana@example.com", "secreto1", Rol::User, true).await;
        let catalog = seed_catalog(&db).await;
        let game = seed_game(&db, "Hades", catalog.categorias[0]).await;

        let err = SaleService::record(&db, user.id, Rol::User, Some(vec![line(user.id, game.id, -100)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(sales::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_record_cart() {
        let db = setup_db().await;
        let user = seed_user(&db, "ana", "ana@example.com", "secreto1", Rol::User, true).await;
        let catalog = seed_catalog(&db).await;
        let g1 = seed_game(&db, "Hades", catalog.categorias[0]).await;
        let g2 = seed_game(&db, "Celeste", catalog.categorias[0]).await;

        let result = SaleService::record(
            &db,
            user.id,
            Rol::User,
            Some(vec![line(user.id, g1.id, 4999), line(user.id, g2.id, 1999)]),
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].juego_id, g1.id);
        assert_eq!(result[1].monto_pagado, Decimal::new(1999, 2));

        let codes: HashSet<_> = result.iter().map(|s| s.codigo.clone()).collect();
        assert_eq!(codes.len(), 2);
    }

    #[actix_web::test]
    async fn test_user_cannot_buy_for_another_account() {
        let db = setup_db().await;
        let ana = seed_user(&db, "ana", "ana@example.com", "secreto1", Rol::User, true).await;
        let eve = seed_user(&db, "eve", "eve@example.com", "secreto1", Rol::User, true).await;
        let catalog = seed_catalog(&db).await;
        let game = seed_game(&db, "Hades", catalog.categorias[0]).await;

        let err = SaleService::record(
            &db,
            eve.id,
            Rol::User,
            Some(vec![line(eve.id, game.id, 999), line(ana.id, game.id, 0)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ForbiddenReason::InsufficientRole)));
        assert_eq!(sales::Entity::find().count(&db).await.unwrap(), 0);

        let result = SaleService::record(
            &db,
            eve.id,
            Rol::Admin,
            Some(vec![line(ana.id, game.id, 999)]),
        )
        .await
        .unwrap();
        assert_eq!(result[0].usuario_id, ana.id);
    }

    #[actix_web::test]
    async fn test_failed_line_rolls_back_whole_cart() {
        let db = setup_db().await;
        let user = seed_user(&db, "ana", "ana@example.com", "secreto1", Rol::User, true).await;
        let catalog = seed_catalog(&db).await;
        let g1 = seed_game(&db, "Hades", catalog.categorias[0]).await;
        let g2 = seed_game(&db, "Celeste", catalog.categorias[0]).await;

        let err = SaleService::record(
            &db,
            user.id,
            Rol::User,
            Some(vec![
                line(user.id, g1.id, 4999),
                line(user.id, g2.id, 1999),
                line(user.id, 999, 999),
            ]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.to_string(), "Error al registrar ventas");
        assert_eq!(sales::Entity::find().count(&db).await.unwrap(), 0);
    }
}
