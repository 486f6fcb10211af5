/// Server-rendered HTML views
///
/// Templates live in `templates/` and are compiled into the binary. Names
/// ending in `.html` are auto-escaped by minijinja, so task content is safe
/// to interpolate.
///
/// # Templates
///
/// ```text
/// layout.html          page chrome, login state
/// tasks/index.html     task list with pagination
/// tasks/create.html    creation form
/// tasks/edit.html      edit form
/// tasks/show.html      task detail with delete button
/// tasks/_form.html     shared content/status fields
/// auth/signup.html     signup form
/// auth/login.html      login form
/// _errors.html         field error list
/// ```

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::error::ApiResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("_errors.html", include_str!("../templates/_errors.html")),
    ("tasks/index.html", include_str!("../templates/tasks/index.html")),
    ("tasks/create.html", include_str!("../templates/tasks/create.html")),
    ("tasks/edit.html", include_str!("../templates/tasks/edit.html")),
    ("tasks/show.html", include_str!("../templates/tasks/show.html")),
    ("tasks/_form.html", include_str!("../templates/tasks/_form.html")),
    ("auth/signup.html", include_str!("../templates/auth/signup.html")),
    ("auth/login.html", include_str!("../templates/auth/login.html")),
];

/// Compiled template set
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Loads and parses every template
    ///
    /// # Errors
    ///
    /// Returns the first template syntax error.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    /// Renders a template with the given context
    pub fn render<C: Serialize>(&self, name: &str, context: C) -> ApiResult<Html<String>> {
        let html = self.env.get_template(name)?.render(context)?;
        Ok(Html(html))
    }
}
