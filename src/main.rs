mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod telemetry;
mod utils;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use tracing::{error, info};

use config::AppConfig;
use services::mailer::{HttpMailer, LogMailer, Mailer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    info!("connecting to database");
    let db = match db::establish_connection(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "failed to connect to database");
            std::process::exit(1);
        }
    };

    if config.sync_schema {
        if let Err(e) = db::sync_schema(&db).await {
            error!(error = %e, "failed to synchronize schema");
            std::process::exit(1);
        }
    }

    let mailer: Arc<dyn Mailer> = match config.mail.clone() {
        Some(mail) => Arc::new(HttpMailer::new(mail)),
        None => Arc::new(LogMailer),
    };
    let mailer = web::Data::from(mailer);

    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);
    let db = web::Data::new(db);

    info!(host = %bind.0, port = bind.1, "starting server");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(config.clone())
            .app_data(mailer.clone())
            .configure(routes::configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
