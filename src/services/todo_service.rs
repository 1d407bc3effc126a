use crate::{
    database::TodoStore,
    models::{group_by_date, TodoItem, TodoView},
    utils::AppError,
};
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateTodoRequest {
    pub completed: bool,
}

/// Normaliza uma data de calendário (YYYY-MM-DD)
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::InvalidRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

pub fn parse_todo_id(raw: &str) -> Result<ObjectId, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidRequest("Todo ID is required.".to_string()));
    }
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::InvalidRequest(format!("Invalid todo ID: {}", raw)))
}

pub async fn list_todos(
    store: &dyn TodoStore,
    owner: &str,
    date: Option<NaiveDate>,
) -> Result<Vec<TodoView>, AppError> {
    let bucket = date.map(|d| d.format(DATE_FORMAT).to_string());

    Ok(store
        .list(owner)
        .await?
        .into_iter()
        .filter(|item| bucket.as_ref().map_or(true, |b| &item.date == b))
        .map(TodoView::from)
        .collect())
}

pub async fn list_todos_by_date(
    store: &dyn TodoStore,
    owner: &str,
) -> Result<BTreeMap<String, Vec<TodoView>>, AppError> {
    Ok(group_by_date(list_todos(store, owner, None).await?))
}

pub async fn create_todo(
    store: &dyn TodoStore,
    owner: &str,
    request: &CreateTodoRequest,
) -> Result<TodoView, AppError> {
    let text = request
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Todo text is required.".to_string()))?;

    let date = request
        .date
        .as_deref()
        .ok_or_else(|| AppError::InvalidRequest("Todo date is required.".to_string()))
        .and_then(parse_date)?;

    let item = TodoItem::new(text.to_string(), date.format(DATE_FORMAT).to_string());
    store.push(owner, &item).await?;

    Ok(TodoView::from(item))
}

pub async fn set_completed(
    store: &dyn TodoStore,
    owner: &str,
    todo_id: &str,
    completed: bool,
) -> Result<(), AppError> {
    let id = parse_todo_id(todo_id)?;
    if !store.set_completed(owner, &id, completed).await? {
        return Err(AppError::NotFound(format!("Todo {} not found", todo_id)));
    }
    Ok(())
}

pub async fn delete_todo(
    store: &dyn TodoStore,
    owner: &str,
    todo_id: &str,
) -> Result<(), AppError> {
    let id = parse_todo_id(todo_id)?;
    if !store.remove(owner, &id).await? {
        return Err(AppError::NotFound(format!("Todo {} not found", todo_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryStore;

    fn request(text: &str, date: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            text: Some(text.to_string()),
            date: Some(date.to_string()),
        }
    }

    #[tokio::test]
    async fn test_todo_lifecycle() {
        let store = InMemoryStore::new();

        let created = create_todo(&store, "luna", &request("stretch", "2024-05-01")).await.unwrap();
        assert!(!created.completed);

        let grouped = list_todos_by_date(&store, "luna").await.unwrap();
        assert_eq!(grouped["2024-05-01"], vec![created.clone()]);

        set_completed(&store, "luna", &created.id, true).await.unwrap();
        let listed = list_todos(&store, "luna", None).await.unwrap();
        assert!(listed[0].completed);

        delete_todo(&store, "luna", &created.id).await.unwrap();
        assert!(list_todos(&store, "luna", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lists_are_per_user() {
        let store = InMemoryStore::new();
        let created = create_todo(&store, "luna", &request("journal", "2024-05-01")).await.unwrap();

        assert!(list_todos(&store, "sol", None).await.unwrap().is_empty());
        assert!(matches!(
            delete_todo(&store, "sol", &created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(list_todos(&store, "luna", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_date_filter() {
        let store = InMemoryStore::new();
        create_todo(&store, "luna", &request("a", "2024-05-01")).await.unwrap();
        create_todo(&store, "luna", &request("b", "2024-05-02")).await.unwrap();

        let day = parse_date("2024-05-02").unwrap();
        let only = list_todos(&store, "luna", Some(day)).await.unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].text, "b");
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let store = InMemoryStore::new();

        assert!(matches!(
            create_todo(&store, "luna", &request("  ", "2024-05-01")).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            create_todo(&store, "luna", &request("x", "05/01/2024")).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            set_completed(&store, "luna", "not-an-id", true).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            set_completed(&store, "luna", &ObjectId::new().to_hex(), true).await,
            Err(AppError::NotFound(_))
        ));
    }
}
