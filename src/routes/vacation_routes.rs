use crate::models::{DaysRequest, ServiceError, Team, User, VacationDraft};
use crate::services::{team_service, vacation_service};
use crate::utils::{get_user_from_request, DocumentStore};
use crate::AppState;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::{Datelike, Utc};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Debug)]
pub struct SummaryQuery {
    pub year: Option<i32>,
}

fn own_team(store: &DocumentStore, user: &User) -> Result<Team, ServiceError> {
    team_service::team_for_user(store, user)?.ok_or_else(|| {
        error!("❌ User: {} is not in a team", user.id);
        ServiceError::NotFound
    })
}

// Request one absence period
#[post("/vacations")]
async fn create_vacation(
    req: HttpRequest,
    state: web::Data<AppState>,
    draft: web::Json<VacationDraft>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let period = vacation_service::add_vacation(&state.store, &user, &draft)?;
    Ok(HttpResponse::Ok().json(period))
}

// Request a set of picked days
#[post("/vacations/days")]
async fn create_vacation_days(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<DaysRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let periods = vacation_service::submit_days(&state.store, &user, &request)?;

    info!("✅ {} absence periods created for user: {}", periods.len(), user.id);
    Ok(HttpResponse::Ok().json(periods))
}

// The caller's own absences, upcoming first
#[get("/vacations/mine")]
async fn my_vacations(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let periods = vacation_service::user_vacations(&state.store, &user.id, Utc::now().date_naive())?;
    Ok(HttpResponse::Ok().json(periods))
}

#[get("/vacations/summary")]
async fn vacation_summary(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let summary = vacation_service::summary(&state.store, &user.id, year)?;
    Ok(HttpResponse::Ok().json(summary))
}

// Every absence of the caller's team, for the shared calendar
#[get("/vacations/team")]
async fn team_vacations(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team = own_team(&state.store, &user)?;

    info!("📅 Fetching absences for team: {}", team.id);
    let periods = vacation_service::team_vacations(&state.store, &team.id)?;
    Ok(HttpResponse::Ok().json(periods))
}

// Team members absent today
#[get("/vacations/current")]
async fn current_absences(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team = own_team(&state.store, &user)?;
    let periods = vacation_service::current_absences(&state.store, &team.id, Utc::now().date_naive())?;
    Ok(HttpResponse::Ok().json(periods))
}

// Requests waiting on the caller's decision
#[get("/vacations/pending")]
async fn pending_vacations(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let periods = vacation_service::pending_for_leader(&state.store, &user.id)?;

    info!("📋 {} pending requests for leader: {}", periods.len(), user.id);
    Ok(HttpResponse::Ok().json(periods))
}

#[get("/vacations/{vacation_id}")]
async fn get_vacation(req: HttpRequest, state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let period = vacation_service::visible_vacation(&state.store, &user, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(period))
}

// Change a pending absence
#[put("/vacations/{vacation_id}")]
async fn update_vacation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    draft: web::Json<VacationDraft>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let period = vacation_service::update_vacation(&state.store, &user, &path.into_inner(), &draft)?;
    Ok(HttpResponse::Ok().json(period))
}

#[delete("/vacations/{vacation_id}")]
async fn delete_vacation(req: HttpRequest, state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let vacation_id = path.into_inner();

    vacation_service::delete_vacation(&state.store, &user, &vacation_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Absence deleted successfully",
        "vacation_id": vacation_id
    })))
}

#[post("/vacations/{vacation_id}/approve")]
async fn approve_vacation(req: HttpRequest, state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let period = vacation_service::approve_vacation(&state.store, &user, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(period))
}

#[post("/vacations/{vacation_id}/reject")]
async fn reject_vacation(req: HttpRequest, state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let period = vacation_service::reject_vacation(&state.store, &user, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(period))
}

// Literal paths go before `{vacation_id}`
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_vacation_days)
        .service(create_vacation)
        .service(my_vacations)
        .service(vacation_summary)
        .service(team_vacations)
        .service(current_absences)
        .service(pending_vacations)
        .service(get_vacation)
        .service(update_vacation)
        .service(delete_vacation)
        .service(approve_vacation)
        .service(reject_vacation);
}

