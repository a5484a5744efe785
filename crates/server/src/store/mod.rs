mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Action, Element, NewAction, NewElement, NewUser, User, Vote};
use crate::tally::VoteValue;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for users, elements, actions and votes.
///
/// Lists come back in creation order. Votes are unique per
/// `(action_id, user_id)`: casting again overwrites the earlier value.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by `/health`.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> StoreResult<()>;

    async fn create_user(&self, new: NewUser) -> StoreResult<User>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn create_element(&self, new: NewElement) -> StoreResult<Element>;
    async fn list_elements(&self) -> StoreResult<Vec<Element>>;
    async fn get_element(&self, id: Uuid) -> StoreResult<Option<Element>>;
    /// Case-insensitive substring match on the title.
    async fn search_elements(&self, query: &str) -> StoreResult<Vec<Element>>;
    /// Whether some element already has this title, ignoring case.
    async fn element_title_exists(&self, title: &str) -> StoreResult<bool>;
    /// Relates `a` and `b` both ways. Linking twice is a no-op.
    async fn link_elements(&self, a: Uuid, b: Uuid) -> StoreResult<()>;

    async fn create_action(&self, new: NewAction) -> StoreResult<Action>;
    async fn list_actions(&self) -> StoreResult<Vec<Action>>;
    async fn get_action(&self, id: Uuid) -> StoreResult<Option<Action>>;

    async fn cast_vote(&self, action_id: Uuid, user_id: Uuid, value: VoteValue)
    -> StoreResult<Vote>;
    async fn votes_for(&self, action_id: Uuid) -> StoreResult<Vec<Vote>>;
}
