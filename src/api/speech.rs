use actix_web::{web, HttpResponse};
use serde::Deserialize;
use crate::{models::Mood, state::AppState, utils::AppError};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TextToSpeechRequest {
    pub text: Option<String>,
    /// "good" ou "bad" (escolhe a voz)
    pub mood: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/TextToSpeech",
    tag = "Speech",
    request_body = TextToSpeechRequest,
    responses(
        (status = 200, description = "MP3 audio stream (audio/mpeg)"),
        (status = 400, description = "Missing text or mood"),
        (status = 500, description = "Speech service unavailable or misconfigured")
    )
)]
pub async fn text_to_speech(
    state: web::Data<AppState>,
    request: web::Json<TextToSpeechRequest>,
) -> HttpResponse {
    let text = request.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let mood = request.mood.as_deref().and_then(|m| m.parse::<Mood>().ok());

    let (text, mood) = match (text, mood) {
        (Some(text), Some(mood)) => (text, mood),
        _ => {
            log::warn!("⚠️  TextToSpeech rejected: text or mood missing");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Please provide text and mood."
            }));
        }
    };

    log::info!("🔊 POST /api/TextToSpeech mood={}", mood);

    match state.speech.synthesize(text, mood).await {
        Ok(upstream) => HttpResponse::Ok()
            .content_type("audio/mpeg")
            .streaming(upstream.bytes_stream()),
        Err(AppError::Misconfigured(msg)) => {
            log::error!("❌ {}", msg);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Speech service is not configured on the server."
            }))
        }
        Err(e) => {
            log::error!("❌ Speech synthesis failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to synthesize speech."
            }))
        }
    }
}
