// connexion BD

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use std::time::Duration;
use tracing::info;

use crate::models::{
    categories, game_platforms, games, images, news, news_images, platforms, sales, users,
};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(10)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Crée les tables manquantes à partir des entités.
/// Ordre imposé par les clés étrangères.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, categories::Entity).await?;
    create_table(db, platforms::Entity).await?;
    create_table(db, games::Entity).await?;
    create_table(db, images::Entity).await?;
    create_table(db, game_platforms::Entity).await?;
    create_table(db, sales::Entity).await?;
    create_table(db, news::Entity).await?;
    create_table(db, news_images::Entity).await?;

    info!("database schema synchronized");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    Ok(())
}
