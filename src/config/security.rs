use axum::http::header::{
    CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

const PERMISSIONS_POLICY: &str = "permissions-policy";

/// Security header values
const NOSNIFF: &str = "nosniff";
const DENY: &str = "DENY";
const XSS_BLOCK: &str = "1; mode=block";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";
const CSP_API_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";
const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";
const PERMISSIONS_POLICY_VALUE: &str = "geolocation=(), microphone=(), camera=()";

fn headers(include_hsts: bool) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = vec![
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static(NOSNIFF)),
        (X_FRAME_OPTIONS, HeaderValue::from_static(DENY)),
        (X_XSS_PROTECTION, HeaderValue::from_static(XSS_BLOCK)),
        (CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP_API_VALUE)),
        (REFERRER_POLICY, HeaderValue::from_static(REFERRER_POLICY_VALUE)),
        (
            HeaderName::from_static(PERMISSIONS_POLICY),
            HeaderValue::from_static(PERMISSIONS_POLICY_VALUE),
        ),
    ];

    // HSTS only makes sense behind HTTPS
    if include_hsts {
        headers.push((STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS_VALUE)));
    }
    headers
}

/// Attach the API security headers to every response of `router`.
pub fn apply_security_headers<S>(router: Router<S>, include_hsts: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if include_hsts {
        tracing::info!("Security: HSTS header enabled (production mode)");
    } else {
        tracing::info!("Security: HSTS header disabled (development mode)");
    }

    headers(include_hsts)
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn response_headers(include_hsts: bool) -> axum::http::HeaderMap {
        let router = Router::new().route("/", get(|| async { "ok" }));
        let app = apply_security_headers(router, include_hsts);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers().clone()
    }

    #[tokio::test]
    async fn test_security_headers_are_set() {
        let headers = response_headers(false).await;
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], NOSNIFF);
        assert_eq!(headers[X_FRAME_OPTIONS], DENY);
        assert_eq!(headers[CONTENT_SECURITY_POLICY], CSP_API_VALUE);
        assert_eq!(headers[PERMISSIONS_POLICY], PERMISSIONS_POLICY_VALUE);
        assert!(headers.get(STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[tokio::test]
    async fn test_hsts_only_in_production() {
        let headers = response_headers(true).await;
        assert_eq!(headers[STRICT_TRANSPORT_SECURITY], HSTS_VALUE);
    }
}
