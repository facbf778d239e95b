use crate::models::{AccessDetails, AccessLog, ServiceError, User};
use crate::utils::DocumentStore;
use chrono::Utc;
use log::{debug, error};
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: usize = 100;

pub fn record(store: &DocumentStore, user: &User, details: AccessDetails) -> Result<AccessLog, ServiceError> {
    let log = AccessLog {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_email: user.email.clone(),
        path: details.path,
        timestamp: Utc::now(),
        user_agent: details.user_agent,
        platform: details.platform,
        language: details.language,
        screen_resolution: details.screen_resolution,
    };

    store.save(&log)?;
    debug!("Access logged for {} at {:?}", user.id, log.path);
    Ok(log)
}

// Newest first; admins only
pub fn list(store: &DocumentStore, caller: &User, limit: Option<usize>) -> Result<Vec<AccessLog>, ServiceError> {
    if !caller.is_admin() {
        error!("❌ User {} is not allowed to read access logs", caller.id);
        return Err(ServiceError::Forbidden);
    }

    let mut logs = store.list::<AccessLog>()?;
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs.truncate(limit.unwrap_or(DEFAULT_LIST_LIMIT));
    Ok(logs)
}
