use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScreenResolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccessLog {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub path: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub screen_resolution: Option<ScreenResolution>,
}

// Client-reported context for a page visit
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AccessDetails {
    pub path: Option<String>,
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub screen_resolution: Option<ScreenResolution>,
}

#[derive(Deserialize, Debug)]
pub struct AccessLogQuery {
    pub limit: Option<usize>,
}
