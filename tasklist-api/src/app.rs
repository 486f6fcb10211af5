/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasklist_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config)?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, views::Views};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasklist_shared::{
    auth::{context::AuthContext, jwt, session},
    services::tasks::TaskService,
    store::{
        postgres::{PgTaskStore, PgUserStore},
        TaskStore, UserStore,
    },
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, warn, Level};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Task persistence
    pub tasks: Arc<dyn TaskStore>,

    /// User persistence
    pub users: Arc<dyn UserStore>,

    /// Ownership-checked task operations
    pub service: TaskService,

    /// Compiled HTML templates
    pub views: Arc<Views>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        Self::with_stores(
            Arc::new(PgTaskStore::new(db.clone())),
            Arc::new(PgUserStore::new(db)),
            config,
        )
    }

    /// Creates application state over arbitrary stores
    pub fn with_stores(
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserStore>,
        config: Config,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            service: TaskService::new(tasks.clone()),
            tasks,
            users,
            views: Arc::new(Views::new()?),
            config: Arc::new(config),
        })
    }

    /// Secret used to sign session tokens
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET     /                   task list (same as /tasks)
/// GET     /tasks              task list
/// POST    /tasks              create task            (login required)
/// GET     /tasks/create       creation form
/// GET     /tasks/:id          task detail
/// PUT     /tasks/:id          update task            (login required)
/// PATCH   /tasks/:id          update task            (login required)
/// DELETE  /tasks/:id          delete task            (login required)
/// POST    /tasks/:id          `_method` form override
/// GET     /tasks/:id/edit     edit form
/// GET     /signup, POST /signup
/// GET     /login,  POST /login
/// GET     /logout
/// GET     /health
/// ```
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Session identity (resolves `AuthContext`)
/// 2. Logging (tower-http TraceLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{auth, health, tasks};

    let task_routes = Router::new()
        .route("/", get(tasks::index))
        .route("/tasks", get(tasks::index).post(tasks::store))
        .route("/tasks/create", get(tasks::create))
        .route(
            "/tasks/:id",
            get(tasks::show)
                .put(tasks::update)
                .patch(tasks::update)
                .delete(tasks::destroy)
                .post(tasks::method_override),
        )
        .route("/tasks/:id/edit", get(tasks::edit));

    let auth_routes = Router::new()
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout));

    Router::new()
        .merge(task_routes)
        .merge(auth_routes)
        .route("/health", get(health::health_check))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_layer,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session middleware
///
/// Resolves the session token (cookie or bearer header) into an
/// [`AuthContext`] request extension. Requests without a usable session
/// pass through as guests; routes that need a user reject them through
/// the extractor.
async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(auth) = resolve_session(&state, req.headers()).await {
        req.extensions_mut().insert(auth);
    }

    next.run(req).await
}

async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<AuthContext> {
    let token = session::extract_token(headers)?;

    let claims = match jwt::validate_session_token(&token, state.session_secret()) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Ignoring unusable session token");
            return None;
        }
    };

    match state.users.find_by_id(claims.sub).await {
        Ok(Some(user)) => Some(AuthContext::from_user(&user)),
        Ok(None) => {
            debug!(user_id = claims.sub, "Session refers to a missing user");
            None
        }
        Err(e) => {
            warn!(user_id = claims.sub, error = %e, "Failed to load session user");
            None
        }
    }
}
