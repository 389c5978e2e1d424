pub mod auth;
pub mod catalog;
pub mod games;
pub mod health;
pub mod news;
pub mod sales;
pub mod users;

use actix_web::web;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Toute erreur d'extraction devient un 400 {"message": ...}
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                .service(health::health_check)
                .configure(users::users_routes)
                .configure(auth::auth_routes)
                .configure(games::games_routes)
                .configure(catalog::catalog_routes)
                .configure(sales::sales_routes)
                .configure(news::news_routes),
        );
}
