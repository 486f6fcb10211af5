/// Integration tests for signup, login and logout
///
/// These go through the real password hashing and session token code, so
/// the cookie issued by one request authenticates the next.

mod common;

use axum::http::StatusCode;
use common::{body_string, cookie_pair, location, set_cookie, TestContext};
use tasklist_shared::store::UserStore;

const SIGNUP: &str = "name=Alice&email=alice%40example.com\
                      &password=correct+horse&password_confirmation=correct+horse";

#[tokio::test]
async fn test_auth_pages_render() {
    let ctx = TestContext::new();

    for uri in ["/signup", "/login"] {
        let response = ctx.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert!(body_string(response).await.contains("name=\"password\""), "{}", uri);
    }
}

#[tokio::test]
async fn test_signup_logs_user_in() {
    let ctx = TestContext::new();

    let response = ctx.post_form("/signup", SIGNUP, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.starts_with("tasklist_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(!cookie.contains("Secure"));

    let user = ctx.store.find_by_email("alice@example.com").await.unwrap().unwrap();
    assert_eq!(user.name, "Alice");
    assert_ne!(user.password_hash, "correct horse");

    // The new session can create tasks straight away
    let session = cookie_pair(&cookie);
    let response = ctx
        .post_form("/tasks", "content=First+task&status=todo", Some(&session))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_string(ctx.get("/", Some(&session)).await).await;
    assert!(body.contains("First task"));
    assert!(body.contains("Logout"));
}

#[tokio::test]
async fn test_signup_rejects_invalid_fields() {
    let ctx = TestContext::new();

    let cases = [
        "name=&email=alice%40example.com&password=correct+horse&password_confirmation=correct+horse",
        "name=Alice&email=not-an-email&password=correct+horse&password_confirmation=correct+horse",
        "name=Alice&email=alice%40example.com&password=short&password_confirmation=short",
        "name=Alice&email=alice%40example.com&password=correct+horse&password_confirmation=wrong+horse",
    ];

    for form in cases {
        let response = ctx.post_form("/signup", form, None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", form);
        assert!(set_cookie(&response).is_none(), "{}", form);

        let body = body_string(response).await;
        assert!(body.contains("class=\"errors\""), "{}", form);
        assert!(!body.contains("correct horse"), "{}", form);
    }

    assert!(ctx.store.find_by_email("alice@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_signup_rejects_taken_email() {
    let ctx = TestContext::new();
    ctx.create_user("Alice", "alice@example.com").await;

    let form = SIGNUP.replace("alice%40example.com", "ALICE%40example.com");
    let response = ctx.post_form("/signup", &form, None).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("The email has already been taken."));
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let ctx = TestContext::new();
    ctx.post_form("/signup", SIGNUP, None).await;

    let response = ctx
        .post_form(
            "/login",
            "email=Alice%40Example.com&password=correct+horse",
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let session = cookie_pair(&set_cookie(&response).unwrap());
    let body = body_string(ctx.get("/", Some(&session)).await).await;
    assert!(body.contains("Alice"));
    assert!(!body.contains("Sign up now!"));
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let ctx = TestContext::new();
    ctx.post_form("/signup", SIGNUP, None).await;

    let cases = [
        "email=alice%40example.com&password=wrong+password",
        "email=nobody%40example.com&password=correct+horse",
        "email=alice%40example.com&password=",
    ];

    for form in cases {
        let response = ctx.post_form("/login", form, None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", form);
        assert!(set_cookie(&response).is_none(), "{}", form);
        assert!(
            body_string(response)
                .await
                .contains("These credentials do not match our records."),
            "{}",
            form
        );
    }
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("Alice", "alice@example.com").await;

    let response = ctx.get("/logout", Some(&ctx.cookie_for(&alice))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.starts_with("tasklist_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}
