use crate::models::{
    normalize_email, AccessDetails, LoginResponse, ProfileUpdate, RegisterRequest, Role,
    ServiceError, User, UserCredentials, UserProfile,
};
use crate::services::{access_log_service, invitation_service};
use crate::utils::{get_user_from_request, jwt, password};
use crate::AppState;
use actix_web::http::header;
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use lazy_static::lazy_static;
use log::{debug, error, info, warn};
use regex::Regex;
use uuid::Uuid;

const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

fn validate_color(color: &Option<String>) -> Result<(), ServiceError> {
    match color {
        Some(color) if !HEX_COLOR.is_match(color) => Err(ServiceError::BadRequest(format!(
            "Invalid color: {}. Use the #rrggbb format",
            color
        ))),
        _ => Ok(()),
    }
}

fn header_value(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

// Register a new user
#[post("/auth/register")]
async fn register(state: web::Data<AppState>, data: web::Json<RegisterRequest>) -> Result<HttpResponse, ServiceError> {
    let email = normalize_email(&data.email);
    info!("📝 Register request for email: {}", email);

    if !invitation_service::is_valid_email(&email) {
        return Err(ServiceError::BadRequest("Invalid email address".to_string()));
    }
    if data.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::BadRequest(format!(
            "Password must have at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    validate_color(&data.color)?;

    let role = data.role.unwrap_or_default();
    if role == Role::Admin {
        return Err(ServiceError::BadRequest("Admins cannot self-register".to_string()));
    }

    // Check if the email already exists
    if state.store.find_one::<User, _>(|user| normalize_email(&user.email) == email)?.is_some() {
        error!("❌ Email already registered: {}", email);
        return Err(ServiceError::Conflict("Email already registered".to_string()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: password::hash_password(&data.password)?,
        first_name: data.first_name.clone(),
        last_name: data.last_name.clone(),
        color: data.color.clone(),
        role,
        team_id: None,
        created_at: now,
        updated_at: now,
    };
    state.store.save(&user)?;

    info!("✅ User registered successfully: {}", user.id);

    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

// Login and get JWT token
#[post("/auth/login")]
async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    credentials: web::Json<UserCredentials>,
) -> Result<HttpResponse, ServiceError> {
    let email = normalize_email(&credentials.email);
    info!("🔑 Login request for email: {}", email);

    let user = match state.store.find_one::<User, _>(|user| normalize_email(&user.email) == email)? {
        Some(user) => user,
        None => {
            error!("❌ User not found: {}", email);
            return Err(ServiceError::Unauthorized);
        }
    };

    if !password::verify_password(&credentials.password, &user.password_hash)? {
        error!("❌ Invalid password for user: {}", email);
        return Err(ServiceError::Unauthorized);
    }

    let token = jwt::generate_token(&user, &state.jwt_secret)?;

    let details = AccessDetails {
        path: Some(req.path().to_string()),
        user_agent: header_value(&req, header::USER_AGENT),
        language: header_value(&req, header::ACCEPT_LANGUAGE),
        ..Default::default()
    };
    if let Err(e) = access_log_service::record(&state.store, &user, details) {
        warn!("Failed to record access for {}: {}", user.id, e);
    }

    info!("✅ User logged in successfully: {}", user.id);

    let response = LoginResponse {
        token: token.clone(),
        user: UserProfile::from(&user),
    };

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(response))
}

// Get current user info
#[get("/auth/me")]
async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    debug!("👤 Get user info request");
    let user = get_user_from_request(&req, &state.store)?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

// Update name and color of the current user
#[put("/users/me")]
async fn update_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let mut user = get_user_from_request(&req, &state.store)?;
    validate_color(&data.color)?;

    info!("🔄 Updating profile for user: {}", user.id);

    if let Some(first_name) = &data.first_name {
        user.first_name = Some(first_name.trim().to_string());
    }
    if let Some(last_name) = &data.last_name {
        user.last_name = Some(last_name.trim().to_string());
    }
    if let Some(color) = &data.color {
        user.color = Some(color.clone());
    }
    user.updated_at = Utc::now();
    state.store.save(&user)?;

    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

// Get user by ID (for team member display)
#[get("/users/{user_id}")]
async fn get_user_by_id(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    get_user_from_request(&req, &state.store)?;
    let target_user_id = path.into_inner();

    match state.store.find::<User>(&target_user_id)? {
        Some(user) => Ok(HttpResponse::Ok().json(UserProfile::from(&user))),
        None => {
            error!("❌ User not found: {}", target_user_id);
            Err(ServiceError::NotFound)
        }
    }
}

// Register all auth routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(me)
        .service(update_profile)
        .service(get_user_by_id);
}
