/// PostgreSQL-backed stores
///
/// Each operation is a single statement against the shared pool; isolation
/// is whatever the server's default transaction level gives a single
/// statement. Concurrent updates to one task are last-write-wins.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
/// use tasklist_shared::store::{postgres::PgTaskStore, TaskStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let tasks = PgTaskStore::new(pool);
/// let page = tasks.list_by_user(1, 1).await?;
/// println!("{} tasks", page.info.total);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{ensure_valid, StoreError, StoreResult, TaskStore, UserStore};
use crate::db::pool;
use crate::models::{
    page::{Page, PageInfo, PER_PAGE},
    task::{Task, TaskInput},
    user::{normalize_email, NewUser, User},
};

const TASK_COLUMNS: &str = "id, user_id, content, status, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// Task store over the `tasks` table
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        task.ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn list_by_user(&self, user_id: i64, page: u32) -> StoreResult<Page<Task>> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let info = PageInfo::new(page, PER_PAGE, u64::try_from(total).unwrap_or(0));

        let items = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(i64::from(info.per_page))
        .bind(i64::try_from(info.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id, page = info.current_page, count = items.len(), "Listed tasks");

        Ok(Page { items, info })
    }

    async fn create(&self, user_id: i64, input: &TaskInput) -> StoreResult<Task> {
        ensure_valid(input)?;

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, content, status)
            VALUES ($1, $2, $3)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&input.content)
        .bind(&input.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::UnknownUser(user_id)
            }
            other => StoreError::Database(other),
        })?;

        debug!(task_id = task.id, user_id, "Created task");
        Ok(task)
    }

    async fn update(&self, task: &Task, input: &TaskInput) -> StoreResult<Task> {
        ensure_valid(input)?;

        let updated = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET content = $2,
                status = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(&input.content)
        .bind(&input.status)
        .fetch_optional(&self.pool)
        .await?;

        // The row can vanish between the caller's lookup and this statement
        let updated = updated.ok_or_else(|| StoreError::task_not_found(task.id))?;

        debug!(task_id = updated.id, "Updated task");
        Ok(updated)
    }

    async fn delete(&self, task: &Task) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::task_not_found(task.id));
        }

        debug!(task_id = task.id, "Deleted task");
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }
}

/// User store over the `users` table
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, data: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(&data.email)
        .bind(data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(format!("Email {} is already registered", data.email))
            }
            other => StoreError::Database(other),
        })?;

        debug!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
