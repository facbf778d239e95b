use crate::models::{AccessDetails, AccessLogQuery, ServiceError};
use crate::services::access_log_service;
use crate::utils::get_user_from_request;
use crate::AppState;
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::info;

// Record a page visit reported by the client
#[post("/access-logs")]
async fn record_access(
    req: HttpRequest,
    state: web::Data<AppState>,
    details: web::Json<AccessDetails>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;

    let mut details = details.into_inner();
    if details.user_agent.is_none() {
        details.user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
    }

    let log = access_log_service::record(&state.store, &user, details)?;
    Ok(HttpResponse::Created().json(log))
}

// Latest accesses (admins only)
#[get("/access-logs")]
async fn list_access_logs(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AccessLogQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let logs = access_log_service::list(&state.store, &user, query.limit)?;

    info!("📋 Returning {} access logs to admin: {}", logs.len(), user.id);
    Ok(HttpResponse::Ok().json(logs))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(record_access).service(list_access_logs);
}
