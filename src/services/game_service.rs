use std::collections::BTreeSet;

use sea_orm::*;
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::models::dto::{GameDetail, GameInput, GameQuery, ImageInput};
use crate::models::{game_platforms, games, images, platforms};

/// Différence entre les plateformes liées et celles soumises
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlatformDelta {
    pub connect: Vec<i32>,
    pub disconnect: Vec<i32>,
}

impl PlatformDelta {
    pub fn is_empty(&self) -> bool {
        self.connect.is_empty() && self.disconnect.is_empty()
    }
}

/// disconnect = current - submitted, connect = submitted - current.
/// Les ids présents des deux côtés ne sont pas touchés.
pub fn reconcile_platforms(current: &[i32], submitted: &[i32]) -> PlatformDelta {
    let current: BTreeSet<i32> = current.iter().copied().collect();
    let submitted: BTreeSet<i32> = submitted.iter().copied().collect();

    PlatformDelta {
        connect: submitted.difference(&current).copied().collect(),
        disconnect: current.difference(&submitted).copied().collect(),
    }
}

pub struct GameService;

impl GameService {
    /// Liste filtrable (0 ou absent = pas de filtre)
    pub async fn list(
        db: &DatabaseConnection,
        query: &GameQuery,
    ) -> Result<Vec<GameDetail>, AppError> {
        let mut select = games::Entity::find().order_by_asc(games::Column::Id);

        if let Some(categoria_id) = query.categoria_id.filter(|id| *id != 0) {
            select = select.filter(games::Column::CategoriaId.eq(categoria_id));
        }

        if let Some(plataforma_id) = query.plataforma_id.filter(|id| *id != 0) {
            let game_ids: Vec<i32> = game_platforms::Entity::find()
                .filter(game_platforms::Column::PlataformaId.eq(plataforma_id))
                .all(db)
                .await?
                .into_iter()
                .map(|link| link.juego_id)
                .collect();
            select = select.filter(games::Column::Id.is_in(game_ids));
        }

        let juegos = select.all(db).await?;
        let imagenes = juegos.load_many(images::Entity, db).await?;
        let plataformas = juegos
            .load_many_to_many(platforms::Entity, game_platforms::Entity, db)
            .await?;

        Ok(juegos
            .into_iter()
            .zip(imagenes)
            .zip(plataformas)
            .map(|((juego, imagenes), plataformas)| GameDetail {
                juego,
                imagenes,
                plataformas,
            })
            .collect())
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<GameDetail, AppError> {
        let juego = games::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(game_not_found)?;

        Self::load_detail(db, juego).await
    }

    pub async fn create(db: &DatabaseConnection, input: GameInput) -> Result<GameDetail, AppError> {
        validate_input(&input)?;

        let txn = db.begin().await?;

        let juego = games::ActiveModel {
            nombre: Set(input.nombre),
            precio: Set(input.precio),
            esta_oferta: Set(input.esta_oferta),
            estado: Set(input.estado),
            categoria_id: Set(input.categoria_id),
            video_url: Set(input.video_url),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(write_error)?;

        insert_images(&txn, juego.id, &input.imagenes).await?;

        let delta = reconcile_platforms(&[], &input.plataformas);
        apply_platform_delta(&txn, juego.id, &delta).await?;

        let detail = Self::load_detail(&txn, juego).await?;
        txn.commit().await?;

        info!(game_id = detail.juego.id, "game created");
        Ok(detail)
    }

    /// Met à jour les champs, remplace toutes les images et applique le delta de plateformes
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: GameInput,
    ) -> Result<GameDetail, AppError> {
        validate_input(&input)?;

        let txn = db.begin().await?;

        let existing = games::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(game_not_found)?;

        let mut active_model: games::ActiveModel = existing.into();
        active_model.nombre = Set(input.nombre);
        active_model.precio = Set(input.precio);
        active_model.esta_oferta = Set(input.esta_oferta);
        active_model.estado = Set(input.estado);
        active_model.categoria_id = Set(input.categoria_id);
        active_model.video_url = Set(input.video_url);
        let juego = active_model.update(&txn).await.map_err(write_error)?;

        // Remplacement destructif: pas de fusion des images
        images::Entity::delete_many()
            .filter(images::Column::JuegoId.eq(id))
            .exec(&txn)
            .await?;
        insert_images(&txn, id, &input.imagenes).await?;

        let current: Vec<i32> = game_platforms::Entity::find()
            .filter(game_platforms::Column::JuegoId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|link| link.plataforma_id)
            .collect();
        let delta = reconcile_platforms(&current, &input.plataformas);
        apply_platform_delta(&txn, id, &delta).await?;

        let detail = Self::load_detail(&txn, juego).await?;
        txn.commit().await?;

        info!(
            game_id = id,
            connected = delta.connect.len(),
            disconnected = delta.disconnect.len(),
            "game updated"
        );
        Ok(detail)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
        let txn = db.begin().await?;

        games::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(game_not_found)?;

        images::Entity::delete_many()
            .filter(images::Column::JuegoId.eq(id))
            .exec(&txn)
            .await?;

        game_platforms::Entity::delete_many()
            .filter(game_platforms::Column::JuegoId.eq(id))
            .exec(&txn)
            .await?;

        // Échoue si des ventes référencent encore le jeu
        games::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::from_db("No se puede eliminar un juego con ventas registradas", e))?;

        txn.commit().await?;

        info!(game_id = id, "game deleted");
        Ok(())
    }

    async fn load_detail<C: ConnectionTrait>(
        db: &C,
        juego: games::Model,
    ) -> Result<GameDetail, AppError> {
        let imagenes = juego
            .find_related(images::Entity)
            .order_by_asc(images::Column::Id)
            .all(db)
            .await?;
        let plataformas = juego
            .find_related(platforms::Entity)
            .order_by_asc(platforms::Column::Id)
            .all(db)
            .await?;

        Ok(GameDetail {
            juego,
            imagenes,
            plataformas,
        })
    }
}

fn game_not_found() -> AppError {
    AppError::not_found("Juego no encontrado")
}

fn validate_input(input: &GameInput) -> Result<(), AppError> {
    input.validate()?;
    validate_images(&input.imagenes)
}

pub(crate) fn validate_images(imagenes: &[ImageInput]) -> Result<(), AppError> {
    if imagenes.iter().any(|img| img.url.trim().is_empty()) {
        return Err(AppError::validation("Cada imagen necesita una url"));
    }
    Ok(())
}

/// Une FK violée à l'écriture = catégorie ou plateforme inconnue
fn write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::validation("Categoría o plataforma inexistente")
        }
        _ => AppError::from(err),
    }
}

async fn insert_images<C: ConnectionTrait>(
    db: &C,
    juego_id: i32,
    imagenes: &[ImageInput],
) -> Result<(), AppError> {
    if imagenes.is_empty() {
        return Ok(());
    }

    let models = imagenes.iter().map(|img| images::ActiveModel {
        url: Set(img.url.clone()),
        descripcion: Set(img.descripcion.clone()),
        juego_id: Set(juego_id),
        ..Default::default()
    });

    images::Entity::insert_many(models)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn apply_platform_delta<C: ConnectionTrait>(
    db: &C,
    juego_id: i32,
    delta: &PlatformDelta,
) -> Result<(), AppError> {
    if delta.is_empty() {
        return Ok(());
    }

    if !delta.disconnect.is_empty() {
        game_platforms::Entity::delete_many()
            .filter(game_platforms::Column::JuegoId.eq(juego_id))
            .filter(game_platforms::Column::PlataformaId.is_in(delta.disconnect.clone()))
            .exec(db)
            .await?;
    }

    if !delta.connect.is_empty() {
        let links = delta.connect.iter().map(|plataforma_id| game_platforms::ActiveModel {
            juego_id: Set(juego_id),
            plataforma_id: Set(*plataforma_id),
        });
        game_platforms::Entity::insert_many(links)
            .exec_without_returning(db)
            .await
            .map_err(write_error)?;
    }

    Ok(())
}
