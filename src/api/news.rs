use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use crate::{models::NewsItem, services::todo_service::parse_date, state::AppState};

pub const NEWS_FAILURE: &str = "뉴스 검색 API 호출 실패";

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NewsQuery {
    /// YYYY-MM-DD; sem data, notícias recentes
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewsResponse {
    pub items: Vec<NewsItem>,
}

#[utoipa::path(
    get,
    path = "/api/News",
    tag = "News",
    params(NewsQuery),
    responses(
        (status = 200, description = "Normalized news items", body = NewsResponse),
        (status = 400, description = "Invalid date"),
        (status = 500, description = "Upstream news request failed")
    )
)]
pub async fn get_news(
    state: web::Data<AppState>,
    query: web::Query<NewsQuery>,
) -> HttpResponse {
    log::info!("📰 GET /api/News date={:?} source={}", query.date, state.news.name());

    let date = match query.date.as_deref().map(parse_date).transpose() {
        Ok(date) => date,
        Err(e) => {
            log::warn!("⚠️  {}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    match state.news.fetch(date).await {
        Ok(items) => {
            log::info!("✅ {} news items", items.len());
            HttpResponse::Ok().json(NewsResponse { items })
        }
        Err(e) => {
            log::error!("❌ News fetch failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": NEWS_FAILURE,
                "details": e.to_string()
            }))
        }
    }
}
