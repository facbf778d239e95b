// End-to-end tests against the full route table
use crate::models::{Role, User};
use crate::services::email_service::EmailClient;
use crate::utils::{jwt, DocumentStore};
use crate::AppState;
use actix_web::web;
use chrono::Utc;
use std::ops::Deref;
use std::path::PathBuf;
use uuid::Uuid;

pub const TEST_SECRET: &str = "holiflow-test-secret";

macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.data())
                .wrap(crate::utils::auth_middleware::Authentication)
                .configure(crate::configure),
        )
        .await
    };
}

mod team_tests;

// App state over a temp-dir store; the directory goes away with the value
pub struct TestState {
    data: web::Data<AppState>,
    root: PathBuf,
}

impl TestState {
    pub fn data(&self) -> web::Data<AppState> {
        self.data.clone()
    }
}

impl Deref for TestState {
    type Target = web::Data<AppState>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl Drop for TestState {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn test_state() -> TestState {
    let root = std::env::temp_dir().join(format!("holiflow-test-{}", Uuid::new_v4()));
    let store = DocumentStore::open(&root).unwrap();
    TestState {
        data: web::Data::new(AppState::new(store, EmailClient::disabled(), TEST_SECRET)),
        root,
    }
}

// Store a user directly and hand back a valid token for it
pub fn seed_user(store: &DocumentStore, email: &str, first_name: &str, role: Role) -> (User, String) {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        first_name: Some(first_name.to_string()),
        last_name: None,
        color: None,
        role,
        team_id: None,
        created_at: now,
        updated_at: now,
    };
    store.save(&user).unwrap();
    let token = jwt::generate_token(&user, TEST_SECRET).unwrap();
    (user, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
