//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A router backed by the in-memory store (no database needed)
//! - Test user creation and session cookies
//! - Request and response helpers

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tasklist_api::app::{build_router, AppState};
use tasklist_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use tasklist_shared::auth::jwt::{create_session_token, SessionClaims};
use tasklist_shared::auth::session::SESSION_COOKIE;
use tasklist_shared::models::task::Task;
use tasklist_shared::models::user::{NewUser, User};
use tasklist_shared::store::{memory::MemoryStore, TaskStore, UserStore};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context: router plus direct access to the store behind it
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 1,
        },
    }
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = test_config();
        let state = AppState::with_stores(store.clone(), store.clone(), config.clone())
            .expect("application state");

        Self {
            store,
            app: build_router(state),
            config,
        }
    }

    /// Creates a user directly in the store
    pub async fn create_user(&self, name: &str, email: &str) -> User {
        UserStore::create(self.store.as_ref(), NewUser::new(name, email, "unused-hash"))
            .await
            .expect("create user")
    }

    /// `Cookie` header value carrying a valid session for `user`
    pub fn cookie_for(&self, user: &User) -> String {
        format!("{}={}", SESSION_COOKIE, self.token_for(user.id))
    }

    pub fn token_for(&self, user_id: i64) -> String {
        let claims = SessionClaims::new(user_id, Duration::hours(1));
        create_session_token(&claims, &self.config.session.secret).expect("session token")
    }

    /// Stores a task for `user` with a pinned creation time
    pub async fn insert_task(&self, user: &User, content: &str, minutes_ago: i64) -> Task {
        let created_at = Utc::now() - Duration::minutes(minutes_ago);
        self.store
            .insert_task(Task {
                id: 0,
                user_id: user.id,
                content: content.to_string(),
                status: "todo".to_string(),
                created_at,
                updated_at: created_at,
            })
            .await
    }

    pub async fn find_task(&self, id: i64) -> Option<Task> {
        TaskStore::find_by_id(self.store.as_ref(), id).await.ok()
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response {
        self.request(Method::POST, uri, Some(form), cookie).await
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        form: Option<&str>,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` part of the response's `Set-Cookie` header
pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}
