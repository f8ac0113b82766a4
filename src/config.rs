use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub statement_page_size: usize,
    pub statement_sample_fallback: bool,
    pub support_email: String,
    /// Credential the identity gateway presents on sign-in. Empty disables sign-in.
    pub auth_shared_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "safepay.db".to_string()),
            statement_page_size: env::var("STATEMENT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &usize| *size > 0)
                .unwrap_or(8),
            statement_sample_fallback: env::var("STATEMENT_SAMPLE_FALLBACK")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            support_email: env::var("SUPPORT_EMAIL")
                .unwrap_or_else(|_| "support@safepayai.example".to_string()),
            auth_shared_secret: env::var("AUTH_SHARED_SECRET").unwrap_or_default(),
        }
    }
}
