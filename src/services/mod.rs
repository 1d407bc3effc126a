pub mod auth_service;
pub mod message_service;
pub mod news_service;
pub mod speech_service;
pub mod todo_service;

pub use news_service::NewsSource;
pub use speech_service::SpeechClient;
