use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Daily Compass API",
        version = "1.0.0",
        description = "Backend for a mood-driven daily companion app.\n\n**Authentication:** to-do endpoints require a JWT Bearer token from `/api/Login`.\n\n**Features:**\n- Random encouraging messages by mood\n- Account signup and login\n- Per-user to-do list\n- Korean news feed\n- Text-to-speech proxy"
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::signup,
        crate::api::auth::verify,

        // Messages
        crate::api::messages::get_random_message,

        // Todos
        crate::api::todos::list_todos,
        crate::api::todos::list_todos_by_date,
        crate::api::todos::create_todo,
        crate::api::todos::update_todo,
        crate::api::todos::delete_todo,

        // News & Speech
        crate::api::news::get_news,
        crate::api::speech::text_to_speech,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::LoginResponse,
            crate::models::UserProfile,
            crate::models::Mood,
            crate::api::messages::MessageResponse,
            crate::models::TodoView,
            crate::services::todo_service::CreateTodoRequest,
            crate::services::todo_service::UpdateTodoRequest,
            crate::models::NewsItem,
            crate::api::news::NewsResponse,
            crate::api::speech::TextToSpeechRequest,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login and token verification."),
        (name = "Messages", description = "Random message for a mood (good or bad)."),
        (name = "Todos", description = "Per-user to-do list. Requires a Bearer token."),
        (name = "News", description = "Recent Korean news, optionally for a given date."),
        (name = "Speech", description = "Text-to-speech with a mood-dependent voice."),
        (name = "Health", description = "Health check and request counters."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/Login"))
                        .build()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/api/GetRandomMessage", "/api/Login", "/api/todos/{id}", "/api/News", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
