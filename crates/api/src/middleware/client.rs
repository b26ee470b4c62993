//! Client metadata extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tessera_core::session::ClientInfo;

/// Header set by the reverse proxy in front of the server.
const FORWARDED_FOR: &str = "x-forwarded-for";

/// User agent and originating IP of the request, stored on the session
/// opened at login. Both are informational and never fail extraction.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta(pub ClientInfo);

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientMeta(client_info(&parts.headers)))
    }
}

fn client_info(headers: &HeaderMap) -> ClientInfo {
    let user_agent = header_str(headers, USER_AGENT.as_str()).map(str::to_string);

    // First entry is the original client; later ones are proxies.
    let ip = header_str(headers, FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string);

    ClientInfo { user_agent, ip }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_reads_agent_and_first_forwarded_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        headers.insert(
            FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        let info = client_info(&headers);
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(info.ip.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_missing_headers() {
        assert_eq!(client_info(&HeaderMap::new()), ClientInfo::default());
    }
}
