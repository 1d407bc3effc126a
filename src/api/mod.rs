pub mod auth;
pub mod health;
pub mod messages;
pub mod metrics;
pub mod news;
pub mod speech;
pub mod swagger;
pub mod todos;

use actix_web::web;
use crate::middleware::{AuthMiddleware, NoCache};

/// Registra todas as rotas HTTP (usado pelo servidor e pelos testes)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Auth endpoints
        .route("/api/Login", web::post().to(auth::login))
        .route("/api/Signup", web::post().to(auth::signup))
        .route("/api/Verify", web::get().to(auth::verify))
        // Random message: nunca cacheado
        .service(
            web::resource("/api/GetRandomMessage")
                .wrap(NoCache)
                .route(web::get().to(messages::get_random_message))
                .route(web::post().to(messages::post_random_message)),
        )
        // News: o front antigo usa /api/news
        .route("/api/News", web::get().to(news::get_news))
        .route("/api/news", web::get().to(news::get_news))
        .route("/api/TextToSpeech", web::post().to(speech::text_to_speech))
        // Todos - Requires identity
        .service(
            web::scope("/api/todos")
                .wrap(AuthMiddleware)
                .service(
                    web::resource("")
                        .route(web::get().to(todos::list_todos))
                        .route(web::post().to(todos::create_todo))
                        .route(web::put().to(todos::missing_todo_id))
                        .route(web::delete().to(todos::missing_todo_id))
                        .default_service(web::to(todos::method_not_allowed)),
                )
                // antes de "/{id}"
                .service(
                    web::resource("/by-date")
                        .route(web::get().to(todos::list_todos_by_date))
                        .default_service(web::to(todos::method_not_allowed)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::put().to(todos::update_todo))
                        .route(web::delete().to(todos::delete_todo))
                        .default_service(web::to(todos::method_not_allowed)),
                ),
        );
}
