/// Error handling for the web server
///
/// Handlers return `ApiResult<T>`. Every error variant maps to a status
/// code and a small HTML error page; internal details are logged and never
/// shown to the client.
///
/// Validation failures on forms are not routed through here: the handler
/// re-renders the form with its messages itself.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;
use tasklist_shared::{
    auth::{jwt::JwtError, password::PasswordError},
    services::tasks::TaskServiceError,
    store::StoreError,
    validation::FieldError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified HTTP error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status code this error is answered with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "Something went wrong on our side.".to_string()
            }
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
        };

        let body = format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{code}</title></head>\
             <body><h1>{code} {reason}</h1><p>{detail}</p><p><a href=\"/\">Back to tasks</a></p></body></html>",
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Error"),
            detail = escape_html(&detail),
        );

        (status, Html(body)).into_response()
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => ApiError::NotFound(format!("{} not found", entity)),
            StoreError::Validation(errors) => ApiError::BadRequest(join_messages(&errors)),
            StoreError::Conflict(msg) => ApiError::InternalError(format!("Conflict: {}", msg)),
            StoreError::UnknownUser(id) => ApiError::InternalError(format!("Unknown user {}", id)),
            StoreError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

/// Convert task service errors to API errors
impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Validation(errors) => ApiError::BadRequest(join_messages(&errors)),
            TaskServiceError::NotFound(_) => ApiError::NotFound("Task not found".to_string()),
            TaskServiceError::Store(e) => e.into(),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session token errors to API errors
///
/// Handlers only ever issue tokens; bad or expired incoming tokens are
/// turned into a guest session before a handler runs.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::InternalError(format!("Session token error: {}", err))
    }
}

/// Convert template errors to API errors
impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        ApiError::InternalError(format!("Template error: {}", err))
    }
}
