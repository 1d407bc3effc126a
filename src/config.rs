use crate::utils::AppError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_NEWS_QUERY: &str = "추천";
pub const DEFAULT_SCRAPE_URL: &str = "https://news.naver.com/main/list.naver?mode=LSD&mid=sec&sid1=001";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub speech: SpeechConfig,
    pub news: NewsConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub message_db: String,
    pub user_db: String,
    pub user_collection: String,
    pub todo_db: String,
    pub todo_collection: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub trust_platform_principal: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SpeechConfig {
    pub key: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsSourceKind {
    Api,
    Scrape,
}

impl FromStr for NewsSourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api" => Ok(NewsSourceKind::Api),
            "scrape" => Ok(NewsSourceKind::Scrape),
            other => Err(AppError::Misconfigured(format!(
                "Invalid NEWS_SOURCE: {}. Supported: api, scrape",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub source: NewsSourceKind,
    pub api_key: Option<String>,
    pub query: String,
    pub scrape_url: String,
    pub scrape_charset: String,
}

impl AppConfig {
    /// Lê toda a configuração do ambiente (após `dotenv`)
    pub fn from_env() -> Result<Self, AppError> {
        let uri = optional("MONGO_URI")
            .ok_or_else(|| AppError::Misconfigured("MONGO_URI must be set".to_string()))?;

        let jwt_secret = optional("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("⚠️  JWT_SECRET not set, using insecure default");
            "default-secret-change-me".to_string()
        });

        let cors_origins = optional("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: with_default("HOST", "0.0.0.0"),
            port: parsed("PORT", 7071)?,
            cors_origins,
            database: DatabaseConfig {
                uri,
                message_db: with_default("MESSAGE_DB", "wisesaying"),
                user_db: with_default("USER_DB", "users"),
                user_collection: with_default("USER_COLLECTION", "userinfo"),
                todo_db: with_default("TODO_DB", "dbmoodpostbox"),
                todo_collection: with_default("TODO_COLLECTION", "todolist"),
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_issuer: with_default("JWT_ISSUER", "daily-compass"),
                jwt_audience: with_default("JWT_AUDIENCE", "daily-compass-web"),
                token_ttl_hours: parsed("JWT_TTL_HOURS", 24)?,
                bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
                trust_platform_principal: parsed("TRUST_PLATFORM_PRINCIPAL", false)?,
            },
            speech: SpeechConfig {
                key: optional("SPEECH_KEY"),
                region: optional("SPEECH_REGION"),
            },
            news: NewsConfig {
                source: with_default("NEWS_SOURCE", "api").parse()?,
                api_key: optional("NEWSAPI_KEY"),
                query: with_default("NEWS_QUERY", DEFAULT_NEWS_QUERY),
                scrape_url: with_default("NEWS_SCRAPE_URL", DEFAULT_SCRAPE_URL),
                scrape_charset: with_default("NEWS_SCRAPE_CHARSET", "euc-kr"),
            },
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn with_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| {
        log::debug!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}

fn parsed<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Misconfigured(format!("Invalid {} value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
impl AuthConfig {
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: "daily-compass".to_string(),
            jwt_audience: "daily-compass-web".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
            trust_platform_principal: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_source_kind_parsing() {
        assert_eq!("api".parse::<NewsSourceKind>().unwrap(), NewsSourceKind::Api);
        assert_eq!(" Scrape ".parse::<NewsSourceKind>().unwrap(), NewsSourceKind::Scrape);
        assert!("rss".parse::<NewsSourceKind>().is_err());
    }
}
