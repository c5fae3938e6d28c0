use std::sync::Arc;

use axum::{Extension, Json, Router, routing::get};

use super::dto::HealthResponse;
use crate::auth::IdentityProvider;

pub fn create_route() -> Router {
    Router::new().route("/health", get(health))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(Extension(provider): Extension<Arc<IdentityProvider>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        identity_provider_loaded: provider.is_loaded(),
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn reports_provider_state() {
        let app = create_route().layer(Extension(Arc::new(IdentityProvider::new())));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["identity_provider_loaded"], false);
    }
}
