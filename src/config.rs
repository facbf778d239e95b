// holiflow-service/src/config.rs
use std::env;
use std::path::PathBuf;

const DEFAULT_ADDRESS: &str = "127.0.0.1:9090";
const DEFAULT_STORAGE_PATH: &str = "./storage";
const DEFAULT_EMAIL_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";
const DEFAULT_SIGNUP_URL: &str = "https://holiflow.pt/auth/signup";

// Credentials for the transactional email API
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub service_id: String,
    pub signin_template_id: String,
    pub signup_template_id: String,
    pub public_key: String,
    pub signup_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub address: String,
    pub storage_path: PathBuf,
    pub jwt_secret: String,
    // None when the email variables are not set
    pub email: Option<EmailConfig>,
}

impl AppConfig {
    // Read configuration from the environment (call dotenv first to pick up .env)
    pub fn from_env() -> Self {
        let email = match (
            env::var("EMAIL_SERVICE_ID"),
            env::var("EMAIL_SIGNIN_TEMPLATE_ID"),
            env::var("EMAIL_SIGNUP_TEMPLATE_ID"),
            env::var("EMAIL_PUBLIC_KEY"),
        ) {
            (Ok(service_id), Ok(signin_template_id), Ok(signup_template_id), Ok(public_key)) => {
                Some(EmailConfig {
                    api_url: env::var("EMAIL_API_URL").unwrap_or_else(|_| DEFAULT_EMAIL_API_URL.to_string()),
                    service_id,
                    signin_template_id,
                    signup_template_id,
                    public_key,
                    signup_url: env::var("SIGNUP_URL").unwrap_or_else(|_| DEFAULT_SIGNUP_URL.to_string()),
                })
            }
            _ => None,
        };

        Self {
            address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string()),
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "holiflow_super_secret_key".to_string()),
            email,
        }
    }
}
