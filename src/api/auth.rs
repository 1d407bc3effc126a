use actix_web::{web, HttpRequest, HttpResponse};
use crate::{
    middleware::auth::bearer_token,
    services::auth_service::{self, LoginRequest, LoginResponse, SignupRequest},
    state::AppState,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/api/Login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Server error")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let login = request.login().unwrap_or("N/A").to_string();
    log::info!("🔐 POST /api/Login - login: {}", login);

    match auth_service::login(state.users.as_ref(), &state.auth, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", login);
            HttpResponse::Ok().json(response)
        }
        Err(AppError::InvalidRequest(code)) => {
            log::warn!("⚠️  Login rejected: {}", code);
            HttpResponse::BadRequest().json(serde_json::json!({ "ok": false, "error": code }))
        }
        Err(AppError::Unauthorized(code)) => {
            log::warn!("❌ Login failed: {} - {}", login, code);
            HttpResponse::Unauthorized().json(serde_json::json!({ "ok": false, "error": code }))
        }
        Err(e) => {
            log::error!("❌ Login error: {} - {}", login, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "ok": false,
                "error": "SERVER_ERROR"
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/Signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "ID already in use"),
        (status = 500, description = "Server error")
    )
)]
pub async fn signup(
    state: web::Data<AppState>,
    request: web::Json<SignupRequest>,
) -> HttpResponse {
    let id = request.id.as_deref().unwrap_or("N/A").to_string();
    log::info!("📝 POST /api/Signup - id: {}", id);

    match auth_service::signup(state.users.as_ref(), &state.auth, &request).await {
        Ok(profile) => {
            log::info!("✅ Signup successful: {}", profile.id);
            HttpResponse::Created().json(serde_json::json!({
                "ok": true,
                "message": "회원가입이 성공적으로 완료되었습니다.",
                "user": profile
            }))
        }
        Err(AppError::InvalidRequest(msg)) => {
            log::warn!("⚠️  Signup rejected: {}", msg);
            HttpResponse::BadRequest().json(serde_json::json!({ "ok": false, "error": msg }))
        }
        Err(AppError::Conflict(msg)) => {
            log::warn!("⚠️  Signup conflict: {}", id);
            HttpResponse::Conflict().json(serde_json::json!({ "ok": false, "error": msg }))
        }
        Err(e) => {
            log::error!("❌ Signup error: {} - {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "ok": false,
                "error": "Server error during signup."
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/Verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> HttpResponse {
    log::info!("✓ GET /api/Verify");

    let token = match bearer_token(req.headers()) {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "ok": false,
                "valid": false,
                "error": "No valid Authorization header"
            }))
        }
    };

    match auth_service::verify_token(&state.auth, token) {
        Ok(claims) => HttpResponse::Ok().json(serde_json::json!({
            "ok": true,
            "valid": true,
            "user_id": claims.sub,
            "nickname": claims.nickname,
            "exp": claims.exp
        })),
        Err(e) => {
            log::warn!("❌ {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "ok": false,
                "valid": false,
                "error": "Invalid or expired token"
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    fn signup_body(id: &str, password: &str) -> serde_json::Value {
        serde_json::json!({ "nickname": "moonlight", "id": id, "password": password })
    }

    #[actix_rt::test]
    async fn test_signup_login_flow() {
        let state = AppState::in_memory(Arc::new(InMemoryStore::new()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/Signup").set_json(signup_body("luna", "pw1")).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post().uri("/api/Signup").set_json(signup_body("luna", "pw2")).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/Login")
            .set_json(serde_json::json!({ "id": "luna", "password": "wrong" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "INVALID_CREDENTIALS");

        let req = test::TestRequest::post()
            .uri("/api/Login")
            .set_json(serde_json::json!({ "id": "luna", "password": "pw1" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: LoginResponse = test::read_body_json(res).await;
        assert_eq!(body.user.nickname, "moonlight");

        let req = test::TestRequest::get()
            .uri("/api/Verify")
            .insert_header(("Authorization", format!("Bearer {}", body.token)))
            .to_request();
        let verified: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(verified["user_id"], "luna");
    }

    #[actix_rt::test]
    async fn test_missing_fields() {
        let state = AppState::in_memory(Arc::new(InMemoryStore::new()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/Signup")
            .set_json(serde_json::json!({ "id": "luna" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/Login")
            .set_json(serde_json::json!({ "id": "luna" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "MISSING_CREDENTIALS");
    }

    #[actix_rt::test]
    async fn test_backend_failure_is_500() {
        let state = AppState::in_memory(Arc::new(InMemoryStore::failing()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::api::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/Login")
            .set_json(serde_json::json!({ "id": "luna", "password": "pw" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
