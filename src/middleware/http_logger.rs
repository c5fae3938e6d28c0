use axum::{extract::Request, middleware::Next, response::Response};
use http::{HeaderMap, HeaderValue, Method};
use std::time::Instant;

const SENSITIVE_HEADERS: [&str; 7] = [
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
    "access-token",
    "refresh-token",
];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/")
}

fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered_headers = headers.clone();

    for header_name in SENSITIVE_HEADERS {
        if filtered_headers.contains_key(header_name) {
            filtered_headers.insert(header_name, HeaderValue::from_static("[REDACTED]"));
        }
    }

    filtered_headers
}

pub async fn http_logger(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    if should_ignore_path(&path) || req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let start_time = Instant::now();
    let method = req.method().clone();
    let version = req.version();
    let req_headers = filter_sensitive_headers(req.headers());
    let x_request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();

    let response = next.run(req).await;
    let latency = start_time.elapsed();

    tracing::info!(
        method = ?method,
        path = %path,
        x_request_id = %x_request_id,
        version = ?version,
        req_headers = ?req_headers,
        status = ?response.status(),
        latency_ms = latency.as_millis(),
        latency_micros = latency.as_micros(),
        res_headers = ?filter_sensitive_headers(response.headers()),
        "HTTP request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_credentials_only() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert("cookie", HeaderValue::from_static("__session=abc"));
        headers.insert("accept", HeaderValue::from_static("text/html"));

        let filtered = filter_sensitive_headers(&headers);
        assert_eq!(filtered["authorization"], "[REDACTED]");
        assert_eq!(filtered["cookie"], "[REDACTED]");
        assert_eq!(filtered["accept"], "text/html");
    }

    #[test]
    fn health_checks_are_not_logged() {
        assert!(should_ignore_path("/health"));
        assert!(!should_ignore_path("/sign-in"));
    }
}
