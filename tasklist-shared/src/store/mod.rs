/// Persistence interfaces
///
/// Handlers never talk to the database directly. They go through
/// [`TaskStore`] and [`UserStore`], which have two implementations:
///
/// - [`postgres`]: sqlx-backed stores over the `tasks` and `users` tables
/// - [`memory`]: an in-process store used by tests and local demos
///
/// # Example
///
/// ```
/// use tasklist_shared::models::{task::TaskInput, user::NewUser};
/// use tasklist_shared::store::{memory::MemoryStore, TaskStore, UserStore};
///
/// # async fn example() -> Result<(), tasklist_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let user = UserStore::create(&store, NewUser::new("Alice", "alice@example.com", "hash")).await?;
///
/// let task = TaskStore::create(&store, user.id, &TaskInput::new("Buy milk", "todo")).await?;
/// let found = TaskStore::find_by_id(&store, task.id).await?;
/// assert_eq!(found.content, "Buy milk");
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

use crate::models::{
    page::Page,
    task::{Task, TaskInput},
    user::{NewUser, User},
};
use crate::validation::FieldError;

pub mod memory;
pub mod postgres;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row with this ID
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Input failed the model's field rules; nothing was written
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// Unique constraint violation (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced owner does not exist
    #[error("User {0} does not exist")]
    UnknownUser(i64),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn task_not_found(id: i64) -> Self {
        StoreError::NotFound { entity: "Task", id }
    }
}

/// Task persistence
///
/// Every implementation validates [`TaskInput`] itself before writing, so
/// an invalid task can never be persisted whatever the caller did.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetches a task by ID
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no task has this ID.
    async fn find_by_id(&self, id: i64) -> StoreResult<Task>;

    /// Lists a user's tasks, newest first, [`crate::models::page::PER_PAGE`]
    /// per page
    ///
    /// Tasks with equal `created_at` are ordered by descending ID, so the
    /// later insert comes first.
    async fn list_by_user(&self, user_id: i64, page: u32) -> StoreResult<Page<Task>>;

    /// Creates a task owned by `user_id`
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` if content or status break the field rules
    /// - `StoreError::UnknownUser` if `user_id` references no user
    async fn create(&self, user_id: i64, input: &TaskInput) -> StoreResult<Task>;

    /// Replaces content and status of an existing task
    ///
    /// The owner is never changed.
    async fn update(&self, task: &Task, input: &TaskInput) -> StoreResult<Task>;

    /// Permanently deletes a task
    async fn delete(&self, task: &Task) -> StoreResult<()>;

    /// Verifies the backing storage is reachable
    async fn health_check(&self) -> StoreResult<()>;
}

/// User account persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a user
    ///
    /// # Errors
    ///
    /// `StoreError::Conflict` if the email is already registered.
    async fn create(&self, data: NewUser) -> StoreResult<User>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    /// Looks up a user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Validates task input at the storage boundary
pub(crate) fn ensure_valid(input: &TaskInput) -> StoreResult<()> {
    input.check().map_err(StoreError::Validation)
}
