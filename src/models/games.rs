use serde::{Deserialize, Serialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "juego")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub precio: Decimal,
    pub esta_oferta: bool,
    pub estado: bool,
    pub categoria_id: i32,
    pub video_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoriaId",
        to = "super::categories::Column::Id"
    )]
    Category,

    #[sea_orm(has_many = "super::images::Entity")]
    Images,

    #[sea_orm(has_many = "super::game_platforms::Entity")]
    GamePlatforms,

    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::game_platforms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamePlatforms.def()
    }
}

// Many-to-many: juego -> juego_plataforma -> plataforma
impl Related<super::platforms::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_platforms::Relation::Platform.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_platforms::Relation::Game.def().rev())
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
