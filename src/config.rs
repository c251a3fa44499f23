use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub ops_token: String,
    pub default_page_size: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "booking.db".to_string()),
            ops_token: env::var("OPS_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &i64| *n > 0)
                .unwrap_or(50),
        }
    }
}
