use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    VacationRequest,
    VacationApproved,
    VacationRejected,
    TeamInvite,
    TeamJoined,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NotificationMetadata {
    pub vacation_id: Option<String>,
    pub team_id: Option<String>,
    pub invitation_id: Option<String>,
}

// Addressed either to a user id or, before the person has an account, to an email
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: NotificationMetadata,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub metadata: NotificationMetadata,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct NotificationFeed {
    pub by_id: Vec<Notification>,
    pub by_email: Vec<Notification>,
    pub unread_by_id: usize,
    pub unread_by_email: usize,
}
