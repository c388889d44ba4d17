use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub ai_api_key: String,
    pub ai_base_url: String,
    pub ai_model: String,
    pub ai_timeout_secs: u64,
    pub whatsapp_token: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_verify_token: String,
    pub whatsapp_app_secret: String,
    pub whatsapp_api_version: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "studiobot.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            ai_api_key: env::var("AI_API_KEY").unwrap_or_default(),
            ai_base_url: env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.together.xyz/v1".to_string()),
            ai_model: env::var("AI_MODEL")
                .unwrap_or_else(|_| "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo".to_string()),
            ai_timeout_secs: env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            whatsapp_token: env::var("WHATSAPP_TOKEN").unwrap_or_default(),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID").unwrap_or_default(),
            whatsapp_verify_token: env::var("WHATSAPP_VERIFY_TOKEN").unwrap_or_default(),
            whatsapp_app_secret: env::var("WHATSAPP_APP_SECRET").unwrap_or_default(),
            whatsapp_api_version: env::var("WHATSAPP_API_VERSION")
                .unwrap_or_else(|_| "v18.0".to_string()),
        }
    }
}
