use chrono::{DateTime, Utc};
use sea_orm::*;
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::models::dto::{ImageInput, NewsDetail, NewsInput};
use crate::models::{news, news_images};
use crate::services::game_service::validate_images;

pub struct NewsService;

impl NewsService {
    /// Plus récentes d'abord
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<NewsDetail>, AppError> {
        let noticias = news::Entity::find()
            .order_by_desc(news::Column::Fecha)
            .order_by_desc(news::Column::Id)
            .all(db)
            .await?;
        let imagenes = noticias.load_many(news_images::Entity, db).await?;

        Ok(noticias
            .into_iter()
            .zip(imagenes)
            .map(|(noticia, imagenes)| NewsDetail { noticia, imagenes })
            .collect())
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<NewsDetail, AppError> {
        let noticia = news::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(news_not_found)?;

        Self::load_detail(db, noticia).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewsInput,
        now: DateTime<Utc>,
    ) -> Result<NewsDetail, AppError> {
        input.validate()?;
        validate_images(&input.imagenes)?;

        let txn = db.begin().await?;

        let noticia = news::ActiveModel {
            titulo: Set(input.titulo),
            contenido: Set(input.contenido),
            fecha: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_images(&txn, noticia.id, &input.imagenes).await?;

        let detail = Self::load_detail(&txn, noticia).await?;
        txn.commit().await?;

        info!(news_id = detail.noticia.id, "news created");
        Ok(detail)
    }

    /// La date de publication reste celle de la création
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        input: NewsInput,
    ) -> Result<NewsDetail, AppError> {
        input.validate()?;
        validate_images(&input.imagenes)?;

        let txn = db.begin().await?;

        let existing = news::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(news_not_found)?;

        let mut active_model: news::ActiveModel = existing.into();
        active_model.titulo = Set(input.titulo);
        active_model.contenido = Set(input.contenido);
        let noticia = active_model.update(&txn).await?;

        news_images::Entity::delete_many()
            .filter(news_images::Column::NoticiaId.eq(id))
            .exec(&txn)
            .await?;
        insert_images(&txn, id, &input.imagenes).await?;

        let detail = Self::load_detail(&txn, noticia).await?;
        txn.commit().await?;

        info!(news_id = id, "news updated");
        Ok(detail)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
        let txn = db.begin().await?;

        news::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(news_not_found)?;

        news_images::Entity::delete_many()
            .filter(news_images::Column::NoticiaId.eq(id))
            .exec(&txn)
            .await?;
        news::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(news_id = id, "news deleted");
        Ok(())
    }

    async fn load_detail<C: ConnectionTrait>(
        db: &C,
        noticia: news::Model,
    ) -> Result<NewsDetail, AppError> {
        let imagenes = noticia
            .find_related(news_images::Entity)
            .order_by_asc(news_images::Column::Id)
            .all(db)
            .await?;

        Ok(NewsDetail { noticia, imagenes })
    }
}

fn news_not_found() -> AppError {
    AppError::not_found("Noticia no encontrada")
}

async fn insert_images<C: ConnectionTrait>(
    db: &C,
    noticia_id: i32,
    imagenes: &[ImageInput],
) -> Result<(), AppError> {
    if imagenes.is_empty() {
        return Ok(());
    }

    let models = imagenes.iter().map(|img| news_images::ActiveModel {
        url: Set(img.url.clone()),
        descripcion: Set(img.descripcion.clone()),
        noticia_id: Set(noticia_id),
        ..Default::default()
    });

    news_images::Entity::insert_many(models)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::test_support::setup_db;

    fn input(titulo: &str, urls: &[&str]) -> NewsInput {
        NewsInput {
            titulo: titulo.to_string(),
            contenido: "Nuevo parche disponible".to_string(),
            imagenes: urls
                .iter()
                .map(|url| ImageInput {
                    url: String::from(*url),
                    descripcion: String::new(),
                })
                .collect(),
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 9, 0, 0).unwrap()
    }

    #[actix_web::test]
    async fn test_list_newest_first() {
        let db = setup_db().await;

        NewsService::create(&db, input("vieja", &[]), day(1)).await.unwrap();
        NewsService::create(&db, input("nueva", &["n.png"]), day(1) + Duration::days(3))
            .await
            .unwrap();

        let list = NewsService::list(&db).await.unwrap();
        let titles: Vec<&str> = list.iter().map(|n| n.noticia.titulo.as_str()).collect();
        assert_eq!(titles, vec!["nueva", "vieja"]);
        assert_eq!(list[0].imagenes.len(), 1);
    }

    #[actix_web::test]
    async fn test_update_keeps_date_and_replaces_images() {
        let db = setup_db().await;

        let created = NewsService::create(&db, input("Torneo", &["a.png", "b.png"]), day(2))
            .await
            .unwrap();
        let updated = NewsService::update(&db, created.noticia.id, input("Torneo final", &["c.png"]))
            .await
            .unwrap();

        assert_eq!(updated.noticia.titulo, "Torneo final");
        assert_eq!(updated.noticia.fecha, day(2));
        assert_eq!(updated.imagenes.len(), 1);
        assert_eq!(updated.imagenes[0].url, "c.png");
        assert_eq!(news_images::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_validation_and_missing() {
        let db = setup_db().await;

        let err = NewsService::create(&db, input("", &[]), day(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "El título es requerido");

        let err = NewsService::create(&db, input("Sin url", &[" "]), day(1)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(matches!(NewsService::get(&db, 42).await, Err(AppError::NotFound(_))));
        assert!(matches!(NewsService::delete(&db, 42).await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_delete_removes_images() {
        let db = setup_db().await;

        let created = NewsService::create(&db, input("Evento", &["a.png"]), day(5)).await.unwrap();
        NewsService::delete(&db, created.noticia.id).await.unwrap();

        assert_eq!(news::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(news_images::Entity::find().count(&db).await.unwrap(), 0);
    }
}
