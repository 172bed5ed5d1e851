//! In-process `UserRepository` used when no database is configured.
//!
//! Records live only as long as the process. Semantics match the PostgreSQL
//! adapter: duplicate inserts are reported as such and updates of unknown ids
//! return `None`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserPatch};

/// Thread-safe in-memory user store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store lock poisoned"))
    }

    /// Number of stored records.
    ///
    /// # Errors
    /// Fails only if a writer panicked while holding the lock.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.len())
    }

    /// Whether no records are stored.
    ///
    /// # Errors
    /// Fails only if a writer panicked while holding the lock.
    pub fn is_empty(&self) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.is_empty())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError> {
        match self.lock()?.entry(user.id().clone()) {
            Entry::Occupied(_) => Err(UserPersistenceError::duplicate(user.id().to_string())),
            Entry::Vacant(slot) => Ok(slot.insert(user.clone()).clone()),
        }
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.get_mut(id).map(|user| {
            user.apply(patch);
            user.clone()
        }))
    }
}
