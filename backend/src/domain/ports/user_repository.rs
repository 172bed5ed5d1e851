//! Port abstraction for the keyed user store and its errors.
use async_trait::async_trait;

use crate::domain::{User, UserId, UserPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// An insert collided with an existing primary key.
        Duplicate { id: String } => "user {id} already exists",
    }
}

/// Keyed store of local user records.
///
/// Adapters report a primary-key collision on [`UserRepository::insert`] as
/// [`UserPersistenceError::Duplicate`] and a missing row on
/// [`UserRepository::update`] as `Ok(None)`, so callers can converge
/// without parsing driver messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new record and return it as stored.
    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Apply a partial update, returning the stored record or `None` when no
    /// record has this identifier.
    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError>;
}
