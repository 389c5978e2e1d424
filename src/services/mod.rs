pub mod auth_service;
pub mod game_service;
pub mod mailer;
pub mod news_service;
pub mod sale_service;
