use crate::api_docs::ApiDoc;
use crate::auth::IdentityProvider;
use crate::config::ServerConfig;
use crate::middleware::http_logger::http_logger;
use crate::routes;
use axum::{Extension, Router, middleware};
use http::header;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    ServiceBuilderExt,
    cors::{AllowOrigin, Any, CorsLayer},
    propagate_header::PropagateHeaderLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn create_app(provider: Arc<IdentityProvider>, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(routes::health::create_route())
        .merge(routes::sign_in::create_route());

    if config.swagger_enabled {
        let swagger_ui =
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());
        router = router.merge(swagger_ui);
    }

    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    // axum middleware goes on the router, tower layers through ServiceBuilder.
    let router = router
        .layer(Extension(provider))
        .layer(middleware::from_fn(http_logger));

    let middleware = ServiceBuilder::new()
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .sensitive_request_headers(sensitive_headers.clone())
        .sensitive_response_headers(sensitive_headers)
        .compression();

    router.layer(middleware)
}

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let allowed_headers = [header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT];

    if allowed_origins == "*" {
        // Credentials cannot be combined with a wildcard origin.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([http::Method::GET, http::Method::OPTIONS])
            .allow_headers(allowed_headers)
            .allow_credentials(false);
    }

    let origins: Vec<http::HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([http::Method::GET, http::Method::OPTIONS])
        .allow_headers(allowed_headers)
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use clap::Parser;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn config(args: &[&str]) -> ServerConfig {
        ServerConfig::try_parse_from(std::iter::once("school_api").chain(args.iter().copied()))
            .unwrap()
    }

    async fn status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn serves_gate_and_health() {
        let provider = Arc::new(IdentityProvider::with_secret(b"secret"));
        let app = create_app(provider, &config(&[]));

        assert_eq!(status(app.clone(), "/health").await, StatusCode::OK);
        assert_eq!(status(app.clone(), "/sign-in").await, StatusCode::OK);
        assert_eq!(status(app, "/api-docs/openapi.json").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_is_loading_without_key() {
        let app = create_app(Arc::new(IdentityProvider::new()), &config(&[]));
        assert_eq!(status(app, "/").await, StatusCode::SERVICE_UNAVAILABLE);
    }
}
