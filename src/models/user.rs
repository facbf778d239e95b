use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Collaborator = 0,
    TeamLeader = 1,
    Admin = 2,
}

impl Role {
    /// Name shown to people in invitation emails.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Collaborator => "Colaborador",
            Role::TeamLeader => "Team Leader",
            Role::Admin => "Admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Collaborator
    }
}

// Stored user record, password hash included
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub team_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last" when a first name is set, otherwise the local part of the email.
    pub fn display_name(&self) -> String {
        match self.first_name.as_deref().filter(|name| !name.trim().is_empty()) {
            Some(first) => match self.last_name.as_deref().filter(|name| !name.trim().is_empty()) {
                Some(last) => format!("{} {}", first.trim(), last.trim()),
                None => first.trim().to_string(),
            },
            None => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// What other users (and the user themselves) get to see
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub color: Option<String>,
    pub role: Role,
    pub team_id: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            color: user.color.clone(),
            role: user.role,
            team_id: user.team_id.clone(),
        }
    }
}

// Sign-up payload
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub color: Option<String>,
    pub role: Option<Role>,
}

// Profile changes; absent fields are left untouched
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub color: Option<String>,
}
