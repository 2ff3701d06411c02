//! API Middleware
//!
//! Operation context extraction and request logging.

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::net::IpAddr;
use uuid::Uuid;

use crate::domain::OperationContext;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

// =========================================================================
// Operation context
// =========================================================================

/// Build an `OperationContext` from request headers.
///
/// The correlation id is taken from `X-Correlation-Id` when it holds a UUID
/// and generated otherwise. The client IP is the first `X-Forwarded-For` hop.
pub fn context_from_headers(headers: &HeaderMap) -> OperationContext {
    let correlation_id = headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .unwrap_or_else(Uuid::new_v4);

    let context = OperationContext::new().with_correlation_id(correlation_id);

    let client_ip = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());

    match client_ip {
        Some(ip) => context.with_client_ip(ip),
        None => context,
    }
}

/// Insert the operation context into request extensions
pub async fn context_middleware(mut request: Request<Body>, next: Next) -> Response {
    let context = context_from_headers(request.headers());
    request.extensions_mut().insert(context);
    next.run(request).await
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "proxy-authorization",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware. Runs inside `context_middleware`.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());

    let (correlation_id, client_ip) = request
        .extensions()
        .get::<OperationContext>()
        .map(|ctx| (ctx.correlation_id, ctx.client_ip))
        .unwrap_or_default();

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = ?correlation_id,
        client_ip = ?client_ip,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("authorization", "Bearer secret-token".parse().unwrap());
        headers.insert("x-correlation-id", "abc".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let auth = masked.iter().find(|(k, _)| k == "authorization");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");
        let correlation = masked.iter().find(|(k, _)| k == "x-correlation-id");

        assert_eq!(auth.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
        assert_eq!(correlation.unwrap().1, "abc");
    }

    #[test]
    fn test_sensitive_headers_list() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(SENSITIVE_HEADERS.contains(&"cookie"));
        assert!(!SENSITIVE_HEADERS.contains(&"content-type"));
    }

    #[test]
    fn test_context_uses_supplied_correlation_id() {
        let correlation_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, correlation_id.to_string().parse().unwrap());
        headers.insert(FORWARDED_FOR_HEADER, "203.0.113.9, 10.0.0.1".parse().unwrap());

        let context = context_from_headers(&headers);
        assert_eq!(context.correlation_id, Some(correlation_id));
        assert_eq!(context.client_ip, Some("203.0.113.9".parse().unwrap()));
    }

    #[test]
    fn test_context_generates_correlation_id() {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, "not-a-uuid".parse().unwrap());
        headers.insert(FORWARDED_FOR_HEADER, "unknown".parse().unwrap());

        let context = context_from_headers(&headers);
        assert!(context.correlation_id.is_some());
        assert!(context.client_ip.is_none());
    }

    #[tokio::test]
    async fn test_request_log_carries_client_ip() {
        use axum::{http::StatusCode, middleware::from_fn, routing::get, Router};
        use tower::util::ServiceExt;

        use crate::test_support::CapturedLogs;

        let app: Router = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(from_fn(logging_middleware))
            .layer(from_fn(context_middleware));

        let (logs, _guard) = CapturedLogs::install();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(FORWARDED_FOR_HEADER, "203.0.113.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let logs = logs.contents();
        assert!(logs.contains("Incoming request"), "logs: {}", logs);
        assert!(logs.contains("client_ip=Some(203.0.113.9)"), "logs: {}", logs);
    }
}
