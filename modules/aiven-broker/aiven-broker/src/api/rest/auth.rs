use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::{HeaderMap, StatusCode, header};
use tracing::debug;

use crate::config::BasicAuth;

/// Rejects requests whose `Authorization: Basic` header does not match the broker credentials.
pub(crate) async fn require_basic_auth(
    State(expected): State<BasicAuth>,
    request: Request,
    next: Next,
) -> Response {
    if is_authorized(&expected, request.headers()) {
        return next.run(request).await;
    }
    debug!(path = %request.uri().path(), "rejected request with invalid credentials");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"aiven-broker\"")],
    )
        .into_response()
}

fn is_authorized(expected: &BasicAuth, headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Some(decoded) = STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    else {
        return false;
    };
    decoded
        .split_once(':')
        .is_some_and(|(user, pass)| user == expected.username && pass == expected.password)
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn expected() -> BasicAuth {
        BasicAuth {
            username: "admin".into(),
            password: "pa:ss".into(),
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn accepts_matching_credentials() {
        let encoded = STANDARD.encode("admin:pa:ss");
        assert!(is_authorized(&expected(), &headers_with(&format!("Basic {encoded}"))));
    }

    #[test]
    fn rejects_missing_or_wrong_credentials() {
        assert!(!is_authorized(&expected(), &HeaderMap::new()));
        let wrong = STANDARD.encode("admin:nope");
        assert!(!is_authorized(&expected(), &headers_with(&format!("Basic {wrong}"))));
        assert!(!is_authorized(&expected(), &headers_with("Bearer token")));
        assert!(!is_authorized(&expected(), &headers_with("Basic not-base64!")));
    }
}
