/// Task operations with ownership rules
///
/// This is the controller logic behind the `/tasks` routes, kept free of
/// HTTP so it can be tested directly. The caller's identity is always an
/// explicit argument.
///
/// # Ownership Rules
///
/// ```text
/// index    guest → empty page        user → own tasks, newest first
/// store    user required             owner = caller
/// show     anyone                    no ownership check
/// edit     anyone                    no ownership check
/// update   validate → find → owner?  not owner → nothing written
/// destroy  find → owner?             not owner → nothing deleted
/// ```
///
/// A non-owner update or destroy is reported as [`Mutation::NotOwner`]
/// rather than an error; the HTTP layer answers it exactly like a
/// successful mutation.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tasklist_shared::auth::context::AuthContext;
/// use tasklist_shared::models::{task::TaskInput, user::NewUser};
/// use tasklist_shared::services::tasks::{Mutation, TaskService};
/// use tasklist_shared::store::{memory::MemoryStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// let alice = store.create(NewUser::new("Alice", "alice@example.com", "hash")).await?;
/// let bob = store.create(NewUser::new("Bob", "bob@example.com", "hash")).await?;
///
/// let service = TaskService::new(store.clone());
/// let alice = AuthContext::from_user(&alice);
/// let bob = AuthContext::from_user(&bob);
///
/// let task = service.store(&alice, TaskInput::new("Buy milk", "todo")).await?;
/// let outcome = service.update(&bob, task.id, TaskInput::new("Hacked", "done")).await?;
/// assert_eq!(outcome, Mutation::NotOwner);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::context::AuthContext;
use crate::models::{
    page::Page,
    task::{Task, TaskInput},
};
use crate::store::{StoreError, TaskStore};
use crate::validation::FieldError;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Submitted fields failed validation; nothing was written
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// No task with this ID
    #[error("Task {0} not found")]
    NotFound(i64),

    /// Storage failure
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TaskServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => TaskServiceError::NotFound(id),
            StoreError::Validation(errors) => TaskServiceError::Validation(errors),
            other => TaskServiceError::Store(other),
        }
    }
}

/// Result type for task operations
pub type TaskResult<T> = Result<T, TaskServiceError>;

/// What an ownership-gated mutation actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    /// The caller owns the task and the write went through
    Applied(T),

    /// The caller does not own the task; nothing was written
    NotOwner,
}

impl<T> Mutation<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied(_))
    }
}

/// Task operations over a [`TaskStore`]
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Lists the caller's tasks; guests get an empty page
    pub async fn index(&self, viewer: Option<&AuthContext>, page: u32) -> TaskResult<Page<Task>> {
        match viewer {
            Some(viewer) => Ok(self.store.list_by_user(viewer.user_id, page).await?),
            None => Ok(Page::empty(page)),
        }
    }

    /// Blank input for the creation form
    pub fn blank(&self) -> TaskInput {
        TaskInput::default()
    }

    /// Validates and persists a new task owned by the caller
    pub async fn store(&self, owner: &AuthContext, input: TaskInput) -> TaskResult<Task> {
        let input = input.normalized();
        input.check().map_err(TaskServiceError::Validation)?;

        let task = self.store.create(owner.user_id, &input).await?;
        info!(task_id = task.id, user_id = owner.user_id, "Task created");

        Ok(task)
    }

    /// Fetches any task by ID (used by both the detail and edit views)
    pub async fn show(&self, id: i64) -> TaskResult<Task> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Updates a task if the caller owns it
    ///
    /// Input is validated before the lookup, so invalid input is reported
    /// even for a missing ID.
    pub async fn update(
        &self,
        actor: &AuthContext,
        id: i64,
        input: TaskInput,
    ) -> TaskResult<Mutation<Task>> {
        let input = input.normalized();
        input.check().map_err(TaskServiceError::Validation)?;

        let task = self.store.find_by_id(id).await?;
        if !task.is_owned_by(actor.user_id) {
            warn!(
                task_id = id,
                owner_id = task.user_id,
                actor_id = actor.user_id,
                "Ignoring update of task owned by another user"
            );
            return Ok(Mutation::NotOwner);
        }

        let updated = self.store.update(&task, &input).await?;
        info!(task_id = id, user_id = actor.user_id, "Task updated");

        Ok(Mutation::Applied(updated))
    }

    /// Deletes a task if the caller owns it
    pub async fn destroy(&self, actor: &AuthContext, id: i64) -> TaskResult<Mutation<()>> {
        let task = self.store.find_by_id(id).await?;
        if !task.is_owned_by(actor.user_id) {
            warn!(
                task_id = id,
                owner_id = task.user_id,
                actor_id = actor.user_id,
                "Ignoring delete of task owned by another user"
            );
            return Ok(Mutation::NotOwner);
        }

        self.store.delete(&task).await?;
        info!(task_id = id, user_id = actor.user_id, "Task deleted");

        Ok(Mutation::Applied(()))
    }
}
