use serde::Serialize;
use sea_orm::entity::prelude::*;

/// Lien jeu <-> plateforme (juego_plataforma)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "juego_plataforma")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub juego_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub plataforma_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::JuegoId",
        to = "super::games::Column::Id",
        on_delete = "Cascade"
    )]
    Game,

    #[sea_orm(
        belongs_to = "super::platforms::Entity",
        from = "Column::PlataformaId",
        to = "super::platforms::Column::Id"
    )]
    Platform,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::platforms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Platform.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
