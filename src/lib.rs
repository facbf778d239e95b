pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use actix_web::web;
use services::email_service::EmailClient;
use utils::DocumentStore;

// Shared by every handler through web::Data
pub struct AppState {
    pub store: DocumentStore,
    pub mailer: EmailClient,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(store: DocumentStore, mailer: EmailClient, jwt_secret: impl Into<String>) -> Self {
        Self {
            store,
            mailer,
            jwt_secret: jwt_secret.into(),
        }
    }
}

// Mount every route group
pub fn configure(cfg: &mut web::ServiceConfig) {
    routes::index_routes::init_routes(cfg);
    routes::auth_routes::init_routes(cfg);
    routes::team_routes::init_routes(cfg);
    routes::invitation_routes::init_routes(cfg);
    routes::vacation_routes::init_routes(cfg);
    routes::notification_routes::init_routes(cfg);
    routes::access_log_routes::init_routes(cfg);
}
