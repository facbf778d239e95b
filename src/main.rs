//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;

use holiflow_service::config::AppConfig;
use holiflow_service::services::email_service::EmailClient;
use holiflow_service::utils::{auth_middleware::Authentication, DocumentStore};
use holiflow_service::{configure, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    let store = DocumentStore::open(&config.storage_path)?;
    let mailer = EmailClient::new(config.email.clone());
    if !mailer.is_enabled() {
        info!("Email variables not set, invitations will not be emailed");
    }

    let state = web::Data::new(AppState::new(store, mailer, config.jwt_secret.clone()));

    info!("Server started at {}", config.address);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Authentication)
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(configure)
    })
        .bind(&config.address)?
        .run()
        .await
}
