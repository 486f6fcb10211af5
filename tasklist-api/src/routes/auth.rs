/// Authentication endpoints
///
/// This module provides the browser sign-in flow:
/// - Signup (creates the user and logs them in)
/// - Login
/// - Logout
///
/// A successful signup or login stores a signed session token in the
/// `tasklist_session` cookie and redirects to `/`.
///
/// # Endpoints
///
/// - `GET /signup`, `POST /signup` - Register new user
/// - `GET /login`, `POST /login` - Log in
/// - `GET /logout` - Clear the session

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;
use serde::{Deserialize, Serialize};
use tasklist_shared::{
    auth::{
        context::AuthContext,
        jwt::{self, SessionClaims},
        password, session,
    },
    models::user::{normalize_email, NewUser},
    store::StoreError,
    validation::{field_errors, FieldError},
};
use tracing::{info, warn};
use validator::Validate;

const HOME: &str = "/";

const EMAIL_TAKEN: &str = "The email has already been taken.";
const PASSWORD_MISMATCH: &str = "The password confirmation does not match.";
const BAD_CREDENTIALS: &str = "These credentials do not match our records.";

/// Signup form
///
/// Passwords are never serialized back into the re-rendered form.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "The name field is required and may not be greater than 255 characters."
    ))]
    pub name: String,

    #[serde(default)]
    #[validate(
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    pub email: String,

    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,

    #[serde(default, skip_serializing)]
    pub password_confirmation: String,
}

impl SignupForm {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        }
    }

    /// Field rules plus the confirmation check
    fn check(&self) -> Vec<FieldError> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        if self.password != self.password_confirmation {
            errors.push(FieldError::new("password", PASSWORD_MISMATCH));
        }

        errors
    }
}

/// Login form
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing)]
    pub password: String,
}

fn render_signup(state: &AppState, form: &SignupForm, errors: &[FieldError]) -> ApiResult<Response> {
    let html = state.views.render(
        "auth/signup.html",
        context! {
            current_user => Option::<AuthContext>::None,
            form => form,
            errors => errors,
        },
    )?;

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, html).into_response())
}

fn render_login(state: &AppState, form: &LoginForm, errors: &[FieldError]) -> ApiResult<Response> {
    let html = state.views.render(
        "auth/login.html",
        context! {
            current_user => Option::<AuthContext>::None,
            form => form,
            errors => errors,
        },
    )?;

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, html).into_response())
}

/// Issues a session cookie for `user_id` and sends the browser home
fn start_session(state: &AppState, user_id: i64) -> ApiResult<Response> {
    let claims = SessionClaims::new(
        user_id,
        chrono::Duration::hours(state.config.session.ttl_hours),
    );
    let token = jwt::create_session_token(&claims, state.session_secret())?;
    let cookie = session::session_cookie(
        &token,
        state.config.session_ttl_seconds(),
        state.config.api.production,
    );

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(HOME)).into_response())
}

/// Signup page
pub async fn signup_form(State(state): State<AppState>) -> ApiResult<Response> {
    render_signup(&state, &SignupForm::default(), &[])
}

/// Registers a new user and logs them in
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Invalid fields or email already registered
/// - `500 Internal Server Error`: Hashing or storage failure
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> ApiResult<Response> {
    let form = form.normalized();

    let errors = form.check();
    if !errors.is_empty() {
        return render_signup(&state, &form, &errors);
    }

    if state.users.find_by_email(&form.email).await?.is_some() {
        return render_signup(&state, &form, &[FieldError::new("email", EMAIL_TAKEN)]);
    }

    let password_hash = password::hash_password(&form.password)?;

    let user = match state
        .users
        .create(NewUser::new(form.name.clone(), &form.email, password_hash))
        .await
    {
        Ok(user) => user,
        // Lost a race with a concurrent signup for the same address
        Err(StoreError::Conflict(_)) => {
            return render_signup(&state, &form, &[FieldError::new("email", EMAIL_TAKEN)]);
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, "User registered");
    start_session(&state, user.id)
}

/// Login page
pub async fn login_form(State(state): State<AppState>) -> ApiResult<Response> {
    render_login(&state, &LoginForm::default(), &[])
}

/// Checks credentials and starts a session
///
/// Unknown email and wrong password get the same message.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> ApiResult<Response> {
    let form = LoginForm {
        email: normalize_email(&form.email),
        ..form
    };

    let user = state.users.find_by_email(&form.email).await?;

    // Unknown emails still pay for one Argon2 verification
    let verified = match &user {
        Some(user) => password::verify_password(&form.password, &user.password_hash)?,
        None => password::verify_dummy(&form.password),
    };

    match user {
        Some(user) if verified => {
            info!(user_id = user.id, "User logged in");
            start_session(&state, user.id)
        }
        _ => {
            warn!(email = %form.email, "Failed login attempt");
            render_login(&state, &form, &[FieldError::new("email", BAD_CREDENTIALS)])
        }
    }
}

/// Clears the session cookie
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = session::clear_session_cookie(state.config.api.production);
    ([(header::SET_COOKIE, cookie)], Redirect::to(HOME)).into_response()
}
