use serde::Serialize;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "plataforma")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_platforms::Entity")]
    GamePlatforms,
}

impl Related<super::game_platforms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamePlatforms.def()
    }
}

// Plusieurs jeux par plateforme, via juego_plataforma
impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_platforms::Relation::Game.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_platforms::Relation::Platform.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
