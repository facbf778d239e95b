use crate::models::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub leader_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Join record between a user and a team
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TeamData {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct DashboardStats {
    pub team_id: String,
    pub total_members: usize,
    pub currently_absent: usize,
    pub pending_requests: usize,
}
