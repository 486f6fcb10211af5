/// Caller identity for request handlers
///
/// The session middleware resolves the session token once per request and
/// inserts an [`AuthContext`] into the request extensions. Handlers receive
/// it as an explicit argument:
///
/// - `auth: AuthContext` for routes that require a logged-in user; guests
///   are redirected to the login page
/// - `auth: Option<AuthContext>` for routes guests may also use
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::auth::context::AuthContext;
///
/// async fn whoami(auth: Option<AuthContext>) -> String {
///     match auth {
///         Some(auth) => format!("user {}", auth.user_id),
///         None => "guest".to_string(),
///     }
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Where guests are sent when a route needs a logged-in user
pub const LOGIN_PATH: &str = "/login";

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Display name, shown in the page header
    pub name: String,
}

impl AuthContext {
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.name.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
