pub mod surreal;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Res, UserRecord, Void};

// Traits.

/// Generic database client trait that clients must implement.
///
/// This trait defines the core functionality for storing and retrieving
/// per-user nickname records. Implementing this trait allows different
/// database backends to be used with the bot.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Gets the user record by its chat platform ID, if one exists.
    async fn get_user(&self, user_id: &str) -> Res<Option<UserRecord>>;

    /// Creates or updates the user record with the given nickname.
    ///
    /// Passing `None` creates a record awaiting a nickname, or clears the
    /// nickname on an existing record. The record itself is never deleted.
    async fn upsert_user(&self, user_id: &str, nickname: Option<&str>) -> Void;
}

// Structs.

/// Database client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}
