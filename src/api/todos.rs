use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use crate::{
    middleware::Identity,
    models::TodoView,
    services::todo_service::{self, CreateTodoRequest, UpdateTodoRequest},
    state::AppState,
    utils::AppError,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TodoListQuery {
    /// YYYY-MM-DD
    pub date: Option<String>,
}

fn failure(context: &str, e: AppError) -> HttpResponse {
    if e.is_server_error() {
        log::error!("❌ {}: {}", context, e);
    } else {
        log::warn!("⚠️  {}: {}", context, e);
    }
    e.error_response()
}

#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "Todos",
    params(TodoListQuery),
    responses(
        (status = 200, description = "User's to-dos (empty when none)", body = [TodoView]),
        (status = 400, description = "Invalid date filter"),
        (status = 401, description = "No identity, body is []")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_todos(
    identity: web::ReqData<Identity>,
    state: web::Data<AppState>,
    query: web::Query<TodoListQuery>,
) -> HttpResponse {
    log::info!("📋 GET /api/todos - user {}", identity.user_id);

    let date = match query.date.as_deref().map(todo_service::parse_date).transpose() {
        Ok(date) => date,
        Err(e) => return failure("Invalid date filter", e),
    };

    match todo_service::list_todos(state.todos.as_ref(), &identity.user_id, date).await {
        Ok(todos) => {
            log::info!("✅ Listed {} todos", todos.len());
            HttpResponse::Ok().json(todos)
        }
        Err(e) => failure("Error listing todos", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/todos/by-date",
    tag = "Todos",
    responses(
        (status = 200, description = "To-dos grouped by calendar date"),
        (status = 401, description = "No identity, body is []")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_todos_by_date(
    identity: web::ReqData<Identity>,
    state: web::Data<AppState>,
) -> HttpResponse {
    log::info!("📅 GET /api/todos/by-date - user {}", identity.user_id);

    match todo_service::list_todos_by_date(state.todos.as_ref(), &identity.user_id).await {
        Ok(grouped) => HttpResponse::Ok().json(grouped),
        Err(e) => failure("Error grouping todos", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "Todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "To-do created", body = TodoView),
        (status = 400, description = "Missing text or invalid date"),
        (status = 401, description = "No identity, body is []")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_todo(
    identity: web::ReqData<Identity>,
    state: web::Data<AppState>,
    request: web::Json<CreateTodoRequest>,
) -> HttpResponse {
    log::info!("📝 POST /api/todos - user {}", identity.user_id);

    match todo_service::create_todo(state.todos.as_ref(), &identity.user_id, &request).await {
        Ok(todo) => {
            log::info!("✅ Todo created: {} ({})", todo.id, todo.date);
            HttpResponse::Created().json(todo)
        }
        Err(e) => failure("Error creating todo", e),
    }
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "Todos",
    request_body = UpdateTodoRequest,
    params(("id" = String, Path, description = "To-do id (hex)")),
    responses(
        (status = 200, description = "To-do updated"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "No such to-do for this user")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_todo(
    identity: web::ReqData<Identity>,
    state: web::Data<AppState>,
    todo_id: web::Path<String>,
    request: web::Json<UpdateTodoRequest>,
) -> HttpResponse {
    log::info!("🔧 PUT /api/todos/{} - user {}", todo_id, identity.user_id);

    match todo_service::set_completed(state.todos.as_ref(), &identity.user_id, &todo_id, request.completed).await {
        Ok(()) => {
            log::info!("✅ Todo updated");
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Todo updated."
            }))
        }
        Err(e) => failure("Error updating todo", e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "Todos",
    params(("id" = String, Path, description = "To-do id (hex)")),
    responses(
        (status = 200, description = "To-do deleted"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "No such to-do for this user")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_todo(
    identity: web::ReqData<Identity>,
    state: web::Data<AppState>,
    todo_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /api/todos/{} - user {}", todo_id, identity.user_id);

    match todo_service::delete_todo(state.todos.as_ref(), &identity.user_id, &todo_id).await {
        Ok(()) => {
            log::info!("✅ Todo deleted");
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Todo deleted."
            }))
        }
        Err(e) => failure("Error deleting todo", e),
    }
}

/// PUT/DELETE sem id no caminho
pub async fn missing_todo_id() -> HttpResponse {
    failure("Rejected", AppError::InvalidRequest("Todo ID is required.".to_string()))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(serde_json::json!({
        "success": false,
        "error": "Method Not Allowed"
    }))
}
