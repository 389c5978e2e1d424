// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Comptes (USER / ADMIN) + token de vérification
//   - categories : Catégories de jeux (lecture seule)
//   - platforms : Plateformes (lecture seule)
//   - games : Jeux du catalogue
//   - images : Images possédées par un jeu
//   - game_platforms : Table de jonction jeu <-> plateforme
//   - sales : Ventes (insérées en lot, transaction unique)
//   - news : Actualités
//   - news_images : Images possédées par une actualité
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - Les noms de tables et les champs JSON gardent les noms du frontend
//     (usuario, juego, venta, categoriaId, ...)
//   - password et token ne sont jamais sérialisés
//
// ============================================================================

pub mod health;
pub mod users;
pub mod categories;
pub mod platforms;
pub mod games;
pub mod images;
pub mod game_platforms;
pub mod sales;
pub mod news;
pub mod news_images;
pub mod dto;
