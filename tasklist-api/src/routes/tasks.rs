/// Task endpoints
///
/// HTML pages and form posts for the task list. Every mutation ends in a
/// redirect to `/`; validation failures re-render the submitted form with
/// a 422 status.
///
/// # Endpoints
///
/// - `GET /`, `GET /tasks` - Caller's tasks, newest first (guests see none)
/// - `GET /tasks/create` - Creation form
/// - `POST /tasks` - Create task (login required)
/// - `GET /tasks/:id` - Task detail
/// - `GET /tasks/:id/edit` - Edit form
/// - `PUT|PATCH /tasks/:id` - Update task (login required, owner only)
/// - `DELETE /tasks/:id` - Delete task (login required, owner only)
/// - `POST /tasks/:id` - Same as above, selected by a `_method` form field

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;
use tasklist_shared::{
    auth::context::AuthContext,
    models::{page::parse_page, task::TaskInput},
    services::tasks::TaskServiceError,
    validation::FieldError,
};

/// Where every mutation sends the browser
const HOME: &str = "/";

/// `?page=` query; parsed leniently so junk means page 1
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Form posted to `POST /tasks/:id`
#[derive(Debug, Default, Deserialize)]
pub struct MethodOverrideForm {
    #[serde(rename = "_method", default)]
    pub method: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub status: String,
}

/// Path IDs that are not numbers cannot name a task
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

fn render_form(
    state: &AppState,
    template: &str,
    auth: Option<&AuthContext>,
    task_id: Option<i64>,
    form: &TaskInput,
    errors: &[FieldError],
) -> ApiResult<Response> {
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    let html = state.views.render(
        template,
        context! {
            current_user => auth,
            task_id => task_id,
            form => form,
            errors => errors,
        },
    )?;

    Ok((status, html).into_response())
}

/// Task list
pub async fn index(
    State(state): State<AppState>,
    auth: Option<AuthContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    let page = parse_page(query.page.as_deref());
    let tasks = state.service.index(auth.as_ref(), page).await?;

    let html = state.views.render(
        "tasks/index.html",
        context! {
            current_user => auth,
            has_previous => tasks.info.has_previous(),
            has_next => tasks.info.has_next(),
            tasks => tasks.items,
            page => tasks.info,
        },
    )?;

    Ok(html.into_response())
}

/// Creation form
pub async fn create(State(state): State<AppState>, auth: Option<AuthContext>) -> ApiResult<Response> {
    render_form(
        &state,
        "tasks/create.html",
        auth.as_ref(),
        None,
        &state.service.blank(),
        &[],
    )
}

/// Creates a task owned by the caller
pub async fn store(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(input): Form<TaskInput>,
) -> ApiResult<Response> {
    match state.service.store(&auth, input.clone()).await {
        Ok(_) => Ok(Redirect::to(HOME).into_response()),
        Err(TaskServiceError::Validation(errors)) => {
            render_form(&state, "tasks/create.html", Some(&auth), None, &input, &errors)
        }
        Err(e) => Err(e.into()),
    }
}

/// Task detail
pub async fn show(
    State(state): State<AppState>,
    auth: Option<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let task = state.service.show(parse_id(&id)?).await?;

    let html = state.views.render(
        "tasks/show.html",
        context! {
            current_user => auth,
            task => task,
        },
    )?;

    Ok(html.into_response())
}

/// Edit form, filled with the stored values
pub async fn edit(
    State(state): State<AppState>,
    auth: Option<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let task = state.service.show(parse_id(&id)?).await?;

    render_form(
        &state,
        "tasks/edit.html",
        auth.as_ref(),
        Some(task.id),
        &TaskInput::from_task(&task),
        &[],
    )
}

/// Updates a task; non-owners are redirected without any change
pub async fn update(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Form(input): Form<TaskInput>,
) -> ApiResult<Response> {
    apply_update(&state, &auth, &id, input).await
}

/// Deletes a task; non-owners are redirected without any change
pub async fn destroy(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    apply_destroy(&state, &auth, &id).await
}

/// Dispatches a browser form to update or destroy by its `_method` field
pub async fn method_override(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Form(form): Form<MethodOverrideForm>,
) -> ApiResult<Response> {
    match form.method.trim().to_ascii_uppercase().as_str() {
        "PUT" | "PATCH" => {
            apply_update(&state, &auth, &id, TaskInput::new(form.content, form.status)).await
        }
        "DELETE" => apply_destroy(&state, &auth, &id).await,
        other => Err(ApiError::BadRequest(format!(
            "Unsupported form method {:?}",
            other
        ))),
    }
}

async fn apply_update(
    state: &AppState,
    auth: &AuthContext,
    id: &str,
    input: TaskInput,
) -> ApiResult<Response> {
    let id = parse_id(id)?;

    match state.service.update(auth, id, input.clone()).await {
        Ok(_) => Ok(Redirect::to(HOME).into_response()),
        Err(TaskServiceError::Validation(errors)) => {
            render_form(state, "tasks/edit.html", Some(auth), Some(id), &input, &errors)
        }
        Err(e) => Err(e.into()),
    }
}

async fn apply_destroy(state: &AppState, auth: &AuthContext, id: &str) -> ApiResult<Response> {
    state.service.destroy(auth, parse_id(id)?).await?;
    Ok(Redirect::to(HOME).into_response())
}
