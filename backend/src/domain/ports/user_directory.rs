//! Driving port for the user REST surface.
//!
//! Handlers depend on this trait rather than the repository so the
//! authorisation stubs and error mapping stay in the domain.

use async_trait::async_trait;

use crate::domain::{DisplayName, Error, User, UserId};

/// Read and self-service operations over local user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a single user; `not_found` when absent.
    async fn fetch_user(&self, id: &UserId) -> Result<User, Error>;

    /// Set the display name; `not_found` when absent.
    async fn update_display_name(
        &self,
        id: &UserId,
        display_name: DisplayName,
    ) -> Result<User, Error>;

    /// List every user. Reserved for administrators.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// The caller's own record.
    async fn current_user(&self) -> Result<User, Error>;
}
