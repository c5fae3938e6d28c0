use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::CookieJar;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::auth::{GateView, IdentityProvider, resolve_view};
use crate::config::SESSION_COOKIE;

/// Identifier and password fields only. The identity provider's widget
/// attaches to the form and handles submission.
const SIGN_IN_FORM: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
  <main>
    <h1>School</h1>
    <h2>Sign in to your account</h2>
    <form id="sign-in">
      <label for="identifier">Username</label>
      <input id="identifier" name="identifier" type="text" required>
      <label for="password">Password</label>
      <input id="password" name="password" type="password" required>
      <button type="submit">Sign In</button>
    </form>
  </main>
</body>
</html>
"#;

pub fn create_route() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/sign-in", get(sign_in))
}

impl IntoResponse for GateView {
    fn into_response(self) -> Response {
        match self {
            GateView::Loading => (StatusCode::SERVICE_UNAVAILABLE, "Loading...").into_response(),
            GateView::SignInForm => Html(SIGN_IN_FORM).into_response(),
            GateView::Redirect(path) => Redirect::to(&path).into_response(),
            GateView::AlreadySignedIn => (StatusCode::OK, "Already signed in.").into_response(),
        }
    }
}

/// Bearer token first, then the provider's session cookie.
fn session_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
        .or_else(|| jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()))
}

fn gate(provider: &IdentityProvider, headers: &HeaderMap, jar: &CookieJar) -> GateView {
    let token = session_token(headers, jar);
    let view = resolve_view(&provider.session_for(token.as_deref()));
    tracing::debug!(?view, "Resolved sign-in view");
    view
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Sign-in form, or already signed in without a role", body = String, content_type = "text/html"),
        (status = 303, description = "Signed in, redirect to the role's landing page"),
        (status = 503, description = "Identity provider still loading")
    ),
    security(("bearer_auth" = [])),
    tag = "Sign in"
)]
pub async fn index(
    Extension(provider): Extension<Arc<IdentityProvider>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> GateView {
    gate(&provider, &headers, &jar)
}

#[utoipa::path(
    get,
    path = "/sign-in",
    responses(
        (status = 200, description = "Sign-in form, or already signed in without a role", body = String, content_type = "text/html"),
        (status = 303, description = "Signed in, redirect to the role's landing page"),
        (status = 503, description = "Identity provider still loading")
    ),
    security(("bearer_auth" = [])),
    tag = "Sign in"
)]
pub async fn sign_in(
    Extension(provider): Extension<Arc<IdentityProvider>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> GateView {
    gate(&provider, &headers, &jar)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use chrono::Duration;
    use http::{Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::provider::test_tokens::{TEST_SECRET, make_token};

    fn app(provider: IdentityProvider) -> Router {
        create_route().layer(Extension(Arc::new(provider)))
    }

    async fn send(app: Router, uri: &str, extra: Option<(header::HeaderName, String)>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some((name, value)) = extra {
            request = request.header(name, value);
        }
        app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }

    fn bearer(token: &str) -> Option<(header::HeaderName, String)> {
        Some((header::AUTHORIZATION, format!("Bearer {token}")))
    }

    #[tokio::test]
    async fn loading_until_key_is_loaded() {
        let response = send(app(IdentityProvider::new()), "/sign-in", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_text(response).await, "Loading...");
    }

    #[tokio::test]
    async fn signed_out_gets_the_form() {
        let response = send(app(IdentityProvider::with_secret(TEST_SECRET)), "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains(r#"name="identifier""#));
        assert!(body.contains(r#"type="password""#));
        // Submission belongs to the provider, no form posts back to the gate.
        assert!(!body.contains("method=\"post\""));
    }

    #[tokio::test]
    async fn role_redirects_to_landing_page() {
        let token = make_token(TEST_SECRET, Some("teacher"), Duration::hours(1));
        let response = send(
            app(IdentityProvider::with_secret(TEST_SECRET)),
            "/sign-in",
            bearer(&token),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/teacher");
    }

    #[tokio::test]
    async fn session_cookie_is_accepted() {
        let token = make_token(TEST_SECRET, Some("parent"), Duration::hours(1));
        let response = send(
            app(IdentityProvider::with_secret(TEST_SECRET)),
            "/sign-in",
            Some((header::COOKIE, format!("{SESSION_COOKIE}={token}"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/parent");
    }

    #[tokio::test]
    async fn role_less_identity_stays_on_sign_in() {
        let token = make_token(TEST_SECRET, None, Duration::hours(1));
        let response = send(
            app(IdentityProvider::with_secret(TEST_SECRET)),
            "/sign-in",
            bearer(&token),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert_eq!(body_text(response).await, "Already signed in.");
    }

    #[tokio::test]
    async fn invalid_token_shows_the_form() {
        let token = make_token(b"someone-else", Some("admin"), Duration::hours(1));
        let response = send(
            app(IdentityProvider::with_secret(TEST_SECRET)),
            "/sign-in",
            bearer(&token),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<form"));
    }
}
