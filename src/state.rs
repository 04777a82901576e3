use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::classifier::IntentClassifier;
use crate::services::faq::FaqProvider;
use crate::services::sessions::SessionStore;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub sessions: SessionStore,
    pub config: AppConfig,
    pub classifier: Box<dyn IntentClassifier>,
    pub faq: Box<dyn FaqProvider>,
}
