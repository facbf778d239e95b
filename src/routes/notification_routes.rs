use crate::models::ServiceError;
use crate::services::notification_service;
use crate::utils::get_user_from_request;
use crate::AppState;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::debug;
use serde_json::json;

// Notifications addressed to the user id and to the user's email
#[get("/notifications")]
async fn get_notifications(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let feed = notification_service::notifications_for(&state.store, &user)?;

    debug!("🔔 {} + {} unread notifications for user: {}", feed.unread_by_id, feed.unread_by_email, user.id);
    Ok(HttpResponse::Ok().json(feed))
}

#[put("/notifications/{notification_id}/read")]
async fn mark_read(req: HttpRequest, state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let notification = notification_service::mark_as_read(&state.store, &user, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(notification))
}

#[post("/notifications/read-all")]
async fn mark_all_read(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    let updated = notification_service::mark_all_as_read(&state.store, &user)?;

    Ok(HttpResponse::Ok().json(json!({
        "updated": updated
    })))
}

#[delete("/notifications/{notification_id}")]
async fn delete_notification(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user = get_user_from_request(&req, &state.store)?;
    notification_service::delete_notification(&state.store, &user, &path.into_inner())?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Notification deleted successfully"
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_notifications)
        .service(mark_all_read)
        .service(mark_read)
        .service(delete_notification);
}
