use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;

/// Documento da collection de to-dos - um por usuário
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub owner: String,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

/// Item dentro do array todos
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TodoItem {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    pub date: String,  // YYYY-MM-DD
    #[serde(default)]
    pub completed: bool,
}

impl TodoItem {
    pub fn new(text: String, date: String) -> Self {
        Self {
            id: ObjectId::new(),
            text,
            date,
            completed: false,
        }
    }
}

/// Representação JSON de um to-do (id em hex)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct TodoView {
    pub id: String,
    pub text: String,
    pub date: String,
    pub completed: bool,
}

impl From<TodoItem> for TodoView {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id.to_hex(),
            text: item.text,
            date: item.date,
            completed: item.completed,
        }
    }
}

/// Agrupa to-dos por data, mantendo a ordem de inserção dentro de cada dia
pub fn group_by_date(todos: Vec<TodoView>) -> BTreeMap<String, Vec<TodoView>> {
    let mut buckets: BTreeMap<String, Vec<TodoView>> = BTreeMap::new();
    for todo in todos {
        buckets.entry(todo.date.clone()).or_default().push(todo);
    }
    buckets
}
