//! Stores em memória para os testes de handlers.

use crate::{
    database::{HealthCheck, MessageStore, TodoStore, UserStore},
    models::{Message, Mood, TodoItem, User},
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStore {
    messages: RwLock<HashMap<Mood, Vec<Message>>>,
    users: RwLock<Vec<User>>,
    todos: RwLock<HashMap<String, Vec<TodoItem>>>,
    pub fail_database: bool,
    /// `nth` sempre vazio: simula remoção entre count e fetch
    pub lose_fetches: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_database: true,
            ..Self::default()
        }
    }

    pub fn racing() -> Self {
        Self {
            lose_fetches: true,
            ..Self::default()
        }
    }

    pub async fn seed_messages(&self, mood: Mood, contents: &[&str]) {
        let mut messages = self.messages.write().await;
        messages.entry(mood).or_default().extend(contents.iter().map(|c| Message {
            content: c.to_string(),
        }));
    }

    pub async fn stored_user(&self, id: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail_database {
            return Err(AppError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn count(&self, mood: Mood) -> Result<u64, AppError> {
        self.check()?;
        Ok(self.messages.read().await.get(&mood).map_or(0, |m| m.len() as u64))
    }

    async fn nth(&self, mood: Mood, offset: u64) -> Result<Option<Message>, AppError> {
        self.check()?;
        if self.lose_fetches {
            return Ok(None);
        }
        Ok(self
            .messages
            .read()
            .await
            .get(&mood)
            .and_then(|m| m.get(offset as usize).cloned()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        self.check()?;
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.id == login || u.email.as_deref() == Some(login))
            .cloned())
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        self.check()?;
        Ok(self.users.read().await.iter().any(|u| u.id == id))
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        self.check()?;
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            return Err(AppError::Conflict(format!("User '{}' already exists", user.id)));
        }
        users.push(user.clone());
        Ok(())
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn list(&self, owner: &str) -> Result<Vec<TodoItem>, AppError> {
        self.check()?;
        Ok(self.todos.read().await.get(owner).cloned().unwrap_or_default())
    }

    async fn push(&self, owner: &str, item: &TodoItem) -> Result<(), AppError> {
        self.check()?;
        self.todos
            .write()
            .await
            .entry(owner.to_string())
            .or_default()
            .push(item.clone());
        Ok(())
    }

    async fn set_completed(&self, owner: &str, id: &ObjectId, completed: bool) -> Result<bool, AppError> {
        self.check()?;
        let mut todos = self.todos.write().await;
        let item = todos
            .get_mut(owner)
            .and_then(|items| items.iter_mut().find(|t| &t.id == id));
        match item {
            Some(item) => {
                item.completed = completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, owner: &str, id: &ObjectId) -> Result<bool, AppError> {
        self.check()?;
        let mut todos = self.todos.write().await;
        match todos.get_mut(owner) {
            Some(items) => {
                let before = items.len();
                items.retain(|t| &t.id != id);
                Ok(items.len() < before)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}
