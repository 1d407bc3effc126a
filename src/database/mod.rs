pub mod stores;
#[cfg(test)]
pub mod memory;

pub use stores::*;

use crate::{
    config::DatabaseConfig,
    models::{Message, Mood, TodoDocument, User},
};
use mongodb::{Client, Collection, Database};
use std::error::Error;
use std::time::Duration;

/// Conexão MongoDB compartilhada pela aplicação
///
/// As três bases (mensagens, usuários, to-dos) ficam no mesmo cluster, mas em
/// databases separadas.
#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    messages_db: Database,
    users: Collection<User>,
    todos: Collection<TodoDocument>,
}

impl MongoDB {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(&config.uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("daily-compass".to_string());

        let client = Client::with_options(client_options)?;

        let mongodb = Self {
            messages_db: client.database(&config.message_db),
            users: client
                .database(&config.user_db)
                .collection(&config.user_collection),
            todos: client
                .database(&config.todo_db)
                .collection(&config.todo_collection),
            client,
        };

        // Test connection
        mongodb.ping().await?;

        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Cria os índices necessários (falhas são apenas logadas)
    async fn ensure_indexes(&self) {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let unique_id = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.users.create_index(unique_id).await {
            Ok(_) => log::info!("   ✅ Index created: users(id) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(id) index: {}", e),
        }

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .build();

        match self.users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.client
            .database("admin")
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    pub fn messages(&self, mood: Mood) -> Collection<Message> {
        self.messages_db.collection(mood.collection_name())
    }

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn todos(&self) -> &Collection<TodoDocument> {
        &self.todos
    }

    /// Encerra o pool de conexões (chamado após o servidor parar)
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}
