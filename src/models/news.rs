use serde::{Deserialize, Serialize};

/// Item de notícia normalizado (não persistido)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub press: String,
    pub time: String,
}
