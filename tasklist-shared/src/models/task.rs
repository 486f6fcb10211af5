/// Task model and input validation
///
/// A task is a short piece of free text plus a status label, owned by
/// exactly one user. The model is a plain data struct: persistence goes
/// through [`crate::store::TaskStore`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content VARCHAR(255) NOT NULL CHECK (char_length(content) > 0),
///     status VARCHAR(10) NOT NULL CHECK (char_length(status) > 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```
/// use tasklist_shared::models::task::TaskInput;
///
/// let input = TaskInput::new("  Buy milk ", "todo").normalized();
/// assert_eq!(input.content, "Buy milk");
/// assert!(input.check().is_ok());
///
/// let invalid = TaskInput::new("", "way-too-long-status");
/// let errors = invalid.check().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validation::{field_errors, FieldError};

/// Maximum task content length, in characters
pub const CONTENT_MAX_CHARS: usize = 255;

/// Maximum status length, in characters
pub const STATUS_MAX_CHARS: usize = 10;

/// A persisted task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// System-assigned task ID
    pub id: i64,

    /// Owning user (immutable after creation)
    pub user_id: i64,

    /// Free text, 1..=255 characters
    pub content: String,

    /// Short status label, 1..=10 characters
    pub status: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether `user_id` owns this task
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// User-supplied task fields, as submitted by the create and edit forms
///
/// Missing form fields deserialize as empty strings so that they fail the
/// `required` rule instead of rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[serde(default)]
    #[validate(
        length(
            min = 1,
            max = 255,
            message = "The content field is required and may not be greater than 255 characters."
        ),
        custom(
            function = no_control_characters,
            message = "The content field may not contain control characters."
        )
    )]
    pub content: String,

    #[serde(default)]
    #[validate(
        length(
            min = 1,
            max = 10,
            message = "The status field is required and may not be greater than 10 characters."
        ),
        custom(
            function = no_control_characters,
            message = "The status field may not contain control characters."
        )
    )]
    pub status: String,
}

/// Rejects NUL, newlines and other control characters
///
/// PostgreSQL refuses NUL in text columns, and neither field is multi-line.
fn no_control_characters(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new("control_characters"));
    }

    Ok(())
}

impl TaskInput {
    pub fn new(content: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: status.into(),
        }
    }

    /// Trims surrounding whitespace, so a blank field counts as missing
    pub fn normalized(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
            status: self.status.trim().to_string(),
        }
    }

    /// Runs the field rules and collects per-field messages
    ///
    /// # Errors
    ///
    /// Returns every violated rule, ordered by field name.
    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        self.validate().map_err(|e| field_errors(&e))
    }

    /// Builds the form-filled view of an existing task (edit form)
    pub fn from_task(task: &Task) -> Self {
        Self::new(task.content.clone(), task.status.clone())
    }
}
