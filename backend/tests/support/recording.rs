//! User repository double counting calls while delegating to memory.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kontaktar_backend::domain::ports::{UserPersistenceError, UserRepository};
use kontaktar_backend::domain::{User, UserId, UserPatch};
use kontaktar_backend::outbound::memory::InMemoryUserRepository;

#[derive(Debug, Default)]
struct Calls {
    find_by_id: AtomicUsize,
    insert: AtomicUsize,
    update: AtomicUsize,
}

/// Wraps [`InMemoryUserRepository`], recording how often each method runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingUserRepository {
    inner: InMemoryUserRepository,
    calls: Arc<Calls>,
}

impl RecordingUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.find_by_id.load(Ordering::SeqCst)
            + self.calls.insert.load(Ordering::SeqCst)
            + self.calls.update.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.find_by_id.store(0, Ordering::SeqCst);
        self.calls.insert.store(0, Ordering::SeqCst);
        self.calls.update.store(0, Ordering::SeqCst);
    }

    pub fn stored_count(&self) -> usize {
        self.inner.len().expect("store lock")
    }

    /// Read a record without counting the call.
    pub async fn peek(&self, id: &str) -> Option<User> {
        let id = UserId::new(id).expect("valid id");
        self.inner.find_by_id(&id).await.expect("store read")
    }

    /// Seed a record without counting the call.
    pub async fn seed(&self, user: &User) {
        self.inner.insert(user).await.expect("seed user");
    }
}

#[async_trait]
impl UserRepository for RecordingUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.calls.find_by_id.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(user).await
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, patch).await
    }
}
