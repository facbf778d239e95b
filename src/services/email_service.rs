// holiflow-service/src/services/email_service.rs
use crate::config::EmailConfig;
use crate::models::{Role, ServiceError};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;

// Which template the invitation goes out with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvitationKind {
    // Address already has an account: just sign in
    SignIn,
    // Address has no account yet: the email carries the sign-up link
    SignUp,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InvitationEmail {
    pub to_email: String,
    pub team_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InvitationEmail {
    pub fn new(to_email: &str, team_name: &str, role: Role, kind: InvitationKind, signup_url: &str) -> Self {
        Self {
            to_email: to_email.to_string(),
            team_name: team_name.to_string(),
            role: role.label().to_string(),
            url: match kind {
                InvitationKind::SignIn => None,
                InvitationKind::SignUp => Some(signup_url.to_string()),
            },
        }
    }
}

// Client for the transactional email REST API
#[derive(Clone)]
pub struct EmailClient {
    config: Option<EmailConfig>,
    http: reqwest::Client,
}

impl EmailClient {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    // A client that never sends anything
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    pub async fn send_invitation(
        &self,
        to_email: &str,
        team_name: &str,
        role: Role,
        kind: InvitationKind,
    ) -> Result<(), ServiceError> {
        let config = match &self.config {
            Some(config) => config,
            None => {
                warn!("✉️ Email not configured, skipping invitation to {}", to_email);
                return Ok(());
            }
        };

        let template_id = match kind {
            InvitationKind::SignIn => &config.signin_template_id,
            InvitationKind::SignUp => &config.signup_template_id,
        };
        let params = InvitationEmail::new(to_email, team_name, role, kind, &config.signup_url);

        let payload = json!({
            "service_id": config.service_id,
            "template_id": template_id,
            "user_id": config.public_key,
            "template_params": params,
        });

        let response = self
            .http
            .post(&config.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Failed to send invitation email to {}: {}", to_email, e);
                ServiceError::InternalServerError
            })?;

        if !response.status().is_success() {
            error!("❌ Email API returned status {} for {}", response.status(), to_email);
            return Err(ServiceError::InternalServerError);
        }

        info!("✉️ Invitation email sent to {}", to_email);
        Ok(())
    }
}
