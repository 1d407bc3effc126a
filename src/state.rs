use crate::{
    config::{AppConfig, AuthConfig},
    database::{HealthCheck, MessageStore, MongoDB, TodoStore, UserStore},
    services::{news_service, NewsSource, SpeechClient},
};
use std::sync::Arc;

/// Dependências compartilhadas pelos handlers (via `web::Data`)
#[derive(Clone)]
pub struct AppState {
    pub messages: Arc<dyn MessageStore>,
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub health: Arc<dyn HealthCheck>,
    pub news: Arc<dyn NewsSource>,
    pub speech: SpeechClient,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(db: MongoDB, config: &AppConfig, http: reqwest::Client) -> Self {
        let db = Arc::new(db);
        Self {
            messages: db.clone(),
            users: db.clone(),
            todos: db.clone(),
            health: db,
            news: news_service::build_news_source(&config.news, http.clone()),
            speech: SpeechClient::new(&config.speech, http),
            auth: config.auth.clone(),
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn in_memory(store: Arc<crate::database::memory::InMemoryStore>) -> Self {
        use crate::config::{NewsConfig, NewsSourceKind, SpeechConfig};

        let news = NewsConfig {
            source: NewsSourceKind::Api,
            api_key: None,
            query: crate::config::DEFAULT_NEWS_QUERY.to_string(),
            scrape_url: crate::config::DEFAULT_SCRAPE_URL.to_string(),
            scrape_charset: "euc-kr".to_string(),
        };
        let http = reqwest::Client::new();

        Self {
            messages: store.clone(),
            users: store.clone(),
            todos: store.clone(),
            health: store,
            news: news_service::build_news_source(&news, http.clone()),
            speech: SpeechClient::new(&SpeechConfig::default(), http),
            auth: AuthConfig::for_tests(),
        }
    }

    pub fn with_news(mut self, news: Arc<dyn NewsSource>) -> Self {
        self.news = news;
        self
    }
}
