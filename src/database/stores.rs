use crate::{
    database::MongoDB,
    models::{Message, Mood, TodoItem, User},
    utils::AppError,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::error::{ErrorKind, WriteFailure};

const DUPLICATE_KEY: i32 = 11000;

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn count(&self, mood: Mood) -> Result<u64, AppError>;

    /// Documento na posição `offset` da ordem natural da collection
    async fn nth(&self, mood: Mood, offset: u64) -> Result<Option<Message>, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Busca por `email` ou `id`
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError>;

    async fn exists(&self, id: &str) -> Result<bool, AppError>;

    /// Retorna `AppError::Conflict` se o id já existir
    async fn insert(&self, user: &User) -> Result<(), AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list(&self, owner: &str) -> Result<Vec<TodoItem>, AppError>;

    async fn push(&self, owner: &str, item: &TodoItem) -> Result<(), AppError>;

    /// `false` quando nenhum item com esse id pertence ao usuário
    async fn set_completed(&self, owner: &str, id: &ObjectId, completed: bool) -> Result<bool, AppError>;

    /// `false` quando nada foi removido
    async fn remove(&self, owner: &str, id: &ObjectId) -> Result<bool, AppError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl MessageStore for MongoDB {
    async fn count(&self, mood: Mood) -> Result<u64, AppError> {
        Ok(self.messages(mood).count_documents(doc! {}).await?)
    }

    async fn nth(&self, mood: Mood, offset: u64) -> Result<Option<Message>, AppError> {
        let mut cursor = self
            .messages(mood)
            .find(doc! {})
            .skip(offset)
            .limit(1)
            .await?;

        Ok(cursor.try_next().await?)
    }
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let filter = doc! {
            "$or": [ { "email": login }, { "id": login } ]
        };
        Ok(self.users().find_one(filter).await?)
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.users().count_documents(doc! { "id": id }).limit(1).await? > 0)
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict(format!("User '{}' already exists", user.id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TodoStore for MongoDB {
    async fn list(&self, owner: &str) -> Result<Vec<TodoItem>, AppError> {
        let document = self.todos().find_one(doc! { "_id": owner }).await?;
        Ok(document.map(|d| d.todos).unwrap_or_default())
    }

    async fn push(&self, owner: &str, item: &TodoItem) -> Result<(), AppError> {
        let item = to_bson(item)?;
        self.todos()
            .update_one(doc! { "_id": owner }, doc! { "$push": { "todos": item } })
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn set_completed(&self, owner: &str, id: &ObjectId, completed: bool) -> Result<bool, AppError> {
        let result = self
            .todos()
            .update_one(
                doc! { "_id": owner, "todos._id": *id },
                doc! { "$set": { "todos.$.completed": completed } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn remove(&self, owner: &str, id: &ObjectId) -> Result<bool, AppError> {
        let result = self
            .todos()
            .update_one(
                doc! { "_id": owner },
                doc! { "$pull": { "todos": { "_id": *id } } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }
}

#[async_trait]
impl HealthCheck for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        MongoDB::ping(self).await.map_err(AppError::from)
    }
}
