use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;

/// UserDirectory Trait
///
/// The lookup the auth context performs after a token validates: a session is only
/// accepted while its subject still exists. Implemented over Postgres in deployments
/// and in memory for tests and database-less local runs.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Option<User>;
}

/// Shared handle stored in `AppState`.
pub type UserDirectoryState = Arc<dyn UserDirectory>;

/// PostgresUserDirectory
///
/// Reads users from `public.profiles`.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, email, role FROM public.profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(user) => user,
            Err(e) => {
                // Lookup failures resolve to "no session".
                tracing::error!(error = %e, user_id = %id, "user directory lookup failed");
                None
            }
        }
    }
}

/// InMemoryUserDirectory
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<Uuid, User>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }
}
