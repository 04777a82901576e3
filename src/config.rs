use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub clinic_open: String,
    pub clinic_close: String,
    pub clinic_phone: String,
    pub faq_data_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "clinicdesk.db".to_string()),
            clinic_open: env::var("CLINIC_OPEN").unwrap_or_else(|_| "09:00".to_string()),
            clinic_close: env::var("CLINIC_CLOSE").unwrap_or_else(|_| "17:00".to_string()),
            clinic_phone: env::var("CLINIC_PHONE").unwrap_or_else(|_| "(unknown)".to_string()),
            faq_data_path: env::var("FAQ_DATA_PATH")
                .unwrap_or_else(|_| "data/clinic_info.json".to_string()),
        }
    }
}
