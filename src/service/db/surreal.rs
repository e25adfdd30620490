//! SurrealDB implementation for nickname storage.

use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::{
    Surreal,
    engine::local::{Db, Mem, RocksDb},
};
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::{Res, UserRecord, Void},
};

use super::{DbClient, GenericDbClient};

// Extra methods on `DbClient` applied by the surreal implementation.

impl DbClient {
    /// Creates a file-backed database client at the configured path.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let db = Surreal::new::<RocksDb>(config.db_path.as_str()).await?;
        let client = SurrealDbClient::new(db).await?;

        Ok(Self::new(Arc::new(client)))
    }

    /// Creates an in-memory database client, mostly useful for tests.
    pub async fn surreal_memory() -> Res<Self> {
        let db = Surreal::new::<Mem>(()).await?;
        let client = SurrealDbClient::new(db).await?;

        Ok(Self::new(Arc::new(client)))
    }
}

// Structs.

/// SurrealDB client implementation.
#[derive(Clone)]
pub struct SurrealDbClient {
    db: Surreal<Db>,
}

impl SurrealDbClient {
    /// Create a new client on an embedded engine and define the schema.
    #[instrument(name = "SurrealDbClient::new", skip_all)]
    pub async fn new(db: Surreal<Db>) -> Res<Self> {
        db.use_ns("nour").use_db("bot").await?;

        // Schema for the per-user nickname table.
        db.query("DEFINE TABLE IF NOT EXISTS user SCHEMAFULL").await?;
        db.query("DEFINE FIELD IF NOT EXISTS nickname ON user TYPE option<string>;").await?;
        db.query("DEFINE FIELD IF NOT EXISTS last_interaction ON user TYPE datetime DEFAULT time::now();").await?;

        info!("Database initialized successfully.");

        Ok(Self { db })
    }
}

#[async_trait]
impl GenericDbClient for SurrealDbClient {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Res<Option<UserRecord>> {
        let user: Option<UserRecord> = self.db.select(("user", user_id)).await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn upsert_user(&self, user_id: &str, nickname: Option<&str>) -> Void {
        self.db
            .query("UPSERT type::thing('user', $user_id) SET nickname = $nickname")
            .bind(("user_id", user_id.to_string()))
            .bind(("nickname", nickname.map(str::to_string)))
            .await?
            .check()?;

        Ok(())
    }
}
