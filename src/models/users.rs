// ============================================================================
// MODÈLE : USUARIO
// ============================================================================
//
// Colonnes de la table usuario:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - nombre (VARCHAR, UNIQUE, NOT NULL) - nom d'affichage
//   - correo (VARCHAR, UNIQUE, NOT NULL) - email
//   - password (VARCHAR, NOT NULL) - Format: pbkdf2:sha256:iterations$salt$hash
//   - rol (VARCHAR(10), NOT NULL) - 'USER' | 'ADMIN'
//   - estado (BOOLEAN, NOT NULL) - false = compte suspendu
//   - token (VARCHAR, NULL) - code de vérification signé (voir utils::verification)
//
// Workflow du token:
//   1. POST /api/auth/forgot-password : code aléatoire + expiration signés, stockés ici
//   2. POST /api/auth/verify-code : vérifie signature, code, expiration
//   3. POST /api/auth/reset-password : change le password et remet token à NULL
//
// Points d'attention:
//   - Un seul code en attente par compte (le dernier écrase le précédent)
//   - Les comptes ne sont jamais supprimés
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Rol {
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usuario")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub nombre: String,
    #[sea_orm(unique)]
    pub correo: String,
    #[serde(skip_serializing)] // Ne jamais exposer le hash
    pub password: String,
    pub rol: Rol,
    pub estado: bool,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
