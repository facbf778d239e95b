// holiflow-service/src/models/invitations.rs
use crate::models::Role;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// Invitations expire after 7 days
pub const INVITATION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InvitationStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "accepted")]
    Accepted,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "expired")]
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
            InvitationStatus::Expired => "expired",
        }
    }
}

// Pending request for an email address to join a team
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Invitation {
    pub id: String,
    pub email: String,
    pub team_id: String,
    pub team_name: String,
    pub role: Role,
    pub status: InvitationStatus,
    pub invited_by: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateInvitationRequest {
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InvitationResponse {
    pub id: String,
    pub status: InvitationStatus,
    pub message: String,
}

impl Invitation {
    pub fn new(team_id: String, team_name: String, email: String, invited_by: String, role: Role) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: normalize_email(&email),
            team_id,
            team_name,
            role,
            status: InvitationStatus::Pending,
            invited_by,
            created_at: now,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn is_for(&self, email: &str) -> bool {
        self.email == normalize_email(email)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
