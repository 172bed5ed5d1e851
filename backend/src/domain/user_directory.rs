//! User directory service backing the `/api/users` endpoints.
//!
//! Listing users and resolving the caller are placeholders until caller
//! authentication lands; both fail closed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{UserDirectory, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, Error, User, UserId, UserPatch};

/// Domain service implementing [`UserDirectory`] over a [`UserRepository`].
#[derive(Clone)]
pub struct UserDirectoryService {
    users: Arc<dyn UserRepository>,
}

impl UserDirectoryService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn map_persistence_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user store call failed");
    Error::internal(err.to_string())
}

fn not_found(id: &UserId) -> Error {
    Error::not_found(format!("User {id} not found"))
}

#[async_trait]
impl UserDirectory for UserDirectoryService {
    async fn fetch_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn update_display_name(
        &self,
        id: &UserId,
        display_name: DisplayName,
    ) -> Result<User, Error> {
        self.users
            .update(id, &UserPatch::display_name(display_name))
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Err(Error::forbidden("Admin access required"))
    }

    async fn current_user(&self) -> Result<User, Error> {
        Err(Error::unauthorized("Authentication required"))
    }
}
