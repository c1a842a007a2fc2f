use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    chatbot::ChatBot,
    config::AppConfig,
    db::{DbPool, OrmConn, create_orm_conn},
    mailer::{self, Mailer},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub chatbot: Arc<ChatBot>,
    /// Serializes the capacity check and insert of new reservations.
    pub booking_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let mailer = mailer::from_settings(config.smtp.as_ref());
        Self::with_mailer(pool, config, mailer)
    }

    pub fn with_mailer(pool: DbPool, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let orm = create_orm_conn(&pool);
        let chatbot = Arc::new(ChatBot::new(
            config.business.clone(),
            config.openai_api_key.clone(),
        ));
        Self {
            pool,
            orm,
            config: Arc::new(config),
            mailer,
            chatbot,
            booking_lock: Arc::new(Mutex::new(())),
        }
    }
}
