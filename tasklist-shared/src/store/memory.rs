/// In-memory store
///
/// Implements both [`TaskStore`] and [`UserStore`] over one shared state so
/// the owner check (`tasks.user_id` must reference a user) behaves like the
/// database foreign key. Useful for:
/// - Exercising handlers and services without PostgreSQL
/// - Local demos
///
/// IDs are assigned sequentially from 1, mirroring `BIGSERIAL`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ensure_valid, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    page::{Page, PageInfo, PER_PAGE},
    task::{Task, TaskInput},
    user::{normalize_email, NewUser, User},
};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    next_user_id: i64,
    next_task_id: i64,
}

/// Shared in-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks, across all users
    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    /// Inserts a task with explicit timestamps
    ///
    /// Lets tests pin `created_at` to check ordering without sleeping.
    pub async fn insert_task(&self, mut task: Task) -> Task {
        let mut state = self.state.write().await;
        state.next_task_id += 1;
        task.id = state.next_task_id;
        state.tasks.insert(task.id, task.clone());
        task
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Task> {
        self.state
            .read()
            .await
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn list_by_user(&self, user_id: i64, page: u32) -> StoreResult<Page<Task>> {
        let state = self.state.read().await;

        let mut owned: Vec<&Task> = state
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let info = PageInfo::new(page, PER_PAGE, owned.len() as u64);
        let skip = usize::try_from(info.offset()).unwrap_or(usize::MAX);

        let items = owned
            .into_iter()
            .skip(skip)
            .take(info.per_page as usize)
            .cloned()
            .collect();

        Ok(Page { items, info })
    }

    async fn create(&self, user_id: i64, input: &TaskInput) -> StoreResult<Task> {
        ensure_valid(input)?;

        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }

        state.next_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: state.next_task_id,
            user_id,
            content: input.content.clone(),
            status: input.status.clone(),
            created_at: now,
            updated_at: now,
        };

        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task, input: &TaskInput) -> StoreResult<Task> {
        ensure_valid(input)?;

        let mut state = self.state.write().await;
        let stored = state
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| StoreError::task_not_found(task.id))?;

        stored.content = input.content.clone();
        stored.status = input.status.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, task: &Task) -> StoreResult<()> {
        self.state
            .write()
            .await
            .tasks
            .remove(&task.id)
            .map(|_| ())
            .ok_or_else(|| StoreError::task_not_found(task.id))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, data: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;

        let email = normalize_email(&data.email);
        if state.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict(format!(
                "Email {} is already registered",
                email
            )));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_user_id,
            name: data.name,
            email,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}
