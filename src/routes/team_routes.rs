use crate::models::{ServiceError, TeamData};
use crate::services::{team_service, vacation_service};
use crate::utils::get_user_from_request;
use crate::AppState;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

// Create a new team led by the current user
#[post("/teams")]
async fn create_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    team_data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team = team_service::create_team(&state.store, &user, &team_data.name)?;
    Ok(HttpResponse::Ok().json(team))
}

// The team the current user belongs to
#[get("/teams/mine")]
async fn get_my_team(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;

    info!("📋 Fetching team for user: {}", user.id);

    match team_service::team_for_user(&state.store, &user)? {
        Some(team) => Ok(HttpResponse::Ok().json(team)),
        None => {
            error!("❌ User: {} is not in a team", user.id);
            Err(ServiceError::NotFound)
        }
    }
}

// Get a specific team by ID
#[get("/teams/{team_id}")]
async fn get_team(req: HttpRequest, state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team_id = path.into_inner();

    info!("🔍 Fetching team: {} for user: {}", team_id, user.id);

    let team = team_service::find_team(&state.store, &team_id)?;
    if !user.is_admin() && !team_service::is_member(&state.store, &user.id, &team_id)? {
        error!("❌ User: {} doesn't have access to team: {}", user.id, team_id);
        return Err(ServiceError::Forbidden);
    }

    Ok(HttpResponse::Ok().json(team))
}

// Rename a team
#[put("/teams/{team_id}")]
async fn update_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    team_data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team = team_service::update_team(&state.store, &user, &path.into_inner(), &team_data.name)?;
    Ok(HttpResponse::Ok().json(team))
}

// Delete a team (leader or admin only)
#[delete("/teams/{team_id}")]
async fn delete_team(req: HttpRequest, state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team_id = path.into_inner();

    let removed = team_service::delete_team(&state.store, &user, &team_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Team deleted successfully",
        "team_id": team_id,
        "members_removed": removed
    })))
}

// Get all members of a team
#[get("/teams/{team_id}/members")]
async fn get_team_members(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team_id = path.into_inner();

    info!("👥 Fetching members for team: {}", team_id);

    team_service::find_team(&state.store, &team_id)?;
    if !user.is_admin() && !team_service::is_member(&state.store, &user.id, &team_id)? {
        error!("❌ User: {} doesn't have access to team: {}", user.id, team_id);
        return Err(ServiceError::Forbidden);
    }

    let members = team_service::team_members(&state.store, &team_id)?;

    info!("✅ Found {} members for team: {}", members.len(), team_id);
    Ok(HttpResponse::Ok().json(members))
}

// Remove a member from a team
#[delete("/teams/{team_id}/members/{user_id}")]
async fn remove_team_member(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let (team_id, member_id) = path.into_inner();

    info!("🗑️ Removing user: {} from team: {}", member_id, team_id);
    team_service::remove_member(&state.store, &user, &team_id, &member_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Team member removed successfully"
    })))
}

// Absence counters for the current user's team
#[get("/dashboard")]
async fn dashboard(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;

    let team = team_service::team_for_user(&state.store, &user)?.ok_or_else(|| {
        error!("❌ User: {} has no team dashboard", user.id);
        ServiceError::NotFound
    })?;

    let stats = vacation_service::dashboard(&state.store, &team.id, Utc::now().date_naive())?;
    Ok(HttpResponse::Ok().json(stats))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(get_my_team)
        .service(get_team)
        .service(update_team)
        .service(delete_team)
        .service(get_team_members)
        .service(remove_team_member)
        .service(dashboard);
}
