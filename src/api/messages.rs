use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use crate::{
    models::Mood,
    services::message_service::{self, RandomMessage, NO_MESSAGES_FALLBACK, RETRY_FALLBACK},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct MoodQuery {
    /// "good" ou "bad"
    pub mood: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub content: String,
}

async fn respond(state: &AppState, raw_mood: Option<&str>) -> HttpResponse {
    let mood = match raw_mood.map(str::parse::<Mood>) {
        Some(Ok(mood)) => mood,
        _ => {
            log::warn!("⚠️  Invalid mood: {:?}", raw_mood);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "A valid mood (good or bad) is required."
            }));
        }
    };

    match message_service::random_message(state.messages.as_ref(), mood).await {
        Ok(RandomMessage::Found(message)) => {
            log::info!("✅ Message delivered for mood '{}'", mood);
            HttpResponse::Ok().json(MessageResponse { content: message.content })
        }
        Ok(RandomMessage::Empty) => {
            log::warn!("⚠️  No messages stored for mood '{}'", mood);
            HttpResponse::NotFound().json(MessageResponse { content: NO_MESSAGES_FALLBACK.to_string() })
        }
        Ok(RandomMessage::Vanished) => {
            log::warn!("⚠️  Message disappeared between count and fetch ('{}')", mood);
            HttpResponse::NotFound().json(MessageResponse { content: RETRY_FALLBACK.to_string() })
        }
        Err(e) => {
            log::error!("❌ Failed to fetch message: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Server error while fetching message."
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/GetRandomMessage",
    tag = "Messages",
    params(MoodQuery),
    responses(
        (status = 200, description = "Random message for the mood", body = MessageResponse),
        (status = 400, description = "Missing or invalid mood"),
        (status = 404, description = "No message available", body = MessageResponse),
        (status = 500, description = "Database error")
    )
)]
pub async fn get_random_message(
    state: web::Data<AppState>,
    query: web::Query<MoodQuery>,
) -> HttpResponse {
    log::info!("💌 GET /api/GetRandomMessage?mood={:?}", query.mood);
    respond(&state, query.mood.as_deref()).await
}

/// POST /api/GetRandomMessage - mood na query ou no corpo JSON
pub async fn post_random_message(
    state: web::Data<AppState>,
    query: web::Query<MoodQuery>,
    body: Option<web::Json<MoodQuery>>,
) -> HttpResponse {
    let mood = query
        .mood
        .clone()
        .or_else(|| body.and_then(|b| b.into_inner().mood));

    log::info!("💌 POST /api/GetRandomMessage mood={:?}", mood);
    respond(&state, mood.as_deref()).await
}
