use crate::models::{CreateInvitationRequest, InvitationResponse, InvitationStatus, ServiceError};
use crate::services::invitation_service;
use crate::utils::get_user_from_request;
use crate::AppState;
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use log::{debug, info};
use serde_json::json;

// Create a new team invitation
#[post("/teams/{team_id}/invitations")]
async fn create_invitation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    data: web::Json<CreateInvitationRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team_id = path.into_inner();

    let invitation =
        invitation_service::invite(&state.store, &state.mailer, &user, &team_id, &data.email, data.role).await?;

    Ok(HttpResponse::Ok().json(invitation))
}

// Get all invitations for a team
#[get("/teams/{team_id}/invitations")]
async fn get_team_invitations(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let team_id = path.into_inner();

    info!("📋 Fetching invitations for team: {}", team_id);

    let invitations = invitation_service::team_invitations(&state.store, &user, &team_id)?;

    info!("✅ Found {} invitations for team: {}", invitations.len(), team_id);
    Ok(HttpResponse::Ok().json(invitations))
}

// Get all invitations addressed to the current user
#[get("/invitations")]
async fn get_user_invitations(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;

    debug!("📋 Fetching invitations for email: {}", user.email);

    let invitations = invitation_service::my_invitations(&state.store, &user)?;
    Ok(HttpResponse::Ok().json(invitations))
}

// Accept an invitation
#[post("/invitations/{invitation_id}/accept")]
async fn accept_invitation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let invitation_id = path.into_inner();

    info!("✅ User: {} accepting invitation: {}", user.id, invitation_id);

    let member = invitation_service::accept(&state.store, &user, &invitation_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "invitation": InvitationResponse {
            id: invitation_id,
            status: InvitationStatus::Accepted,
            message: "Invitation accepted successfully".to_string(),
        },
        "member": member
    })))
}

// Refuse an invitation
#[post("/invitations/{invitation_id}/refuse")]
async fn refuse_invitation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let invitation_id = path.into_inner();

    invitation_service::refuse(&state.store, &user, &invitation_id)?;

    Ok(HttpResponse::Ok().json(InvitationResponse {
        id: invitation_id,
        status: InvitationStatus::Rejected,
        message: "Invitation refused".to_string(),
    }))
}

// Cancel an invitation (team leader, inviter or admin)
#[delete("/invitations/{invitation_id}")]
async fn delete_invitation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let invitation_id = path.into_inner();

    info!("🗑️ Deleting invitation: {}", invitation_id);
    invitation_service::cancel(&state.store, &user, &invitation_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Invitation deleted successfully"
    })))
}

// Register all invitation routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_invitation)
        .service(get_team_invitations)
        .service(get_user_invitations)
        .service(accept_invitation)
        .service(refuse_invitation)
        .service(delete_invitation);
}
