use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::RawQuery,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Echo payload returned by `POST /submit`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitEcho {
    pub content_type: String,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(|| async { "hello" }))
        .route("/status", get(|| async { "OK" }))
        .route("/echo-query", get(echo_query))
        .route("/submit", post(submit))
        .route("/headers", get(echo_headers))
        .route("/redirect", get(|| async { Redirect::temporary("/status") }))
        .route("/set-cookie", get(set_cookie))
        .route("/cookie-echo", get(cookie_echo))
        .route("/authed", get(authed))
        .route("/modified", get(modified))
        .route("/slow", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Return the raw query string, exactly as received.
async fn echo_query(RawQuery(query): RawQuery) -> String {
    query.unwrap_or_default()
}

/// Echo the request body and its content type back as JSON.
async fn submit(headers: HeaderMap, body: String) -> Json<SubmitEcho> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(SubmitEcho { content_type, body })
}

/// Echo all request headers as a sorted name → value map.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(
        headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
    )
}

async fn set_cookie() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "session=abc123; Path=/")],
        "cookie set",
    )
}

/// Return the Cookie request header, empty when none was sent.
async fn cookie_echo(headers: HeaderMap) -> String {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// 200 with the fixed Basic credentials alice/secret, 401 otherwise.
async fn authed(headers: HeaderMap) -> Response {
    // "Basic " + base64("alice:secret")
    const EXPECTED: &str = "Basic YWxpY2U6c2VjcmV0";
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) if value == EXPECTED => (StatusCode::OK, "welcome").into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"mock\"")],
            "auth required",
        )
            .into_response(),
    }
}

/// Serve a body with a Last-Modified header.
async fn modified() -> impl IntoResponse {
    (
        [(header::LAST_MODIFIED, "Wed, 21 Oct 2015 07:28:00 GMT")],
        "old content",
    )
}

/// Take two seconds to answer, for exercising client timeouts.
async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "slow"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_echo_serializes_to_json() {
        let echo = SubmitEcho {
            content_type: "application/x-www-form-urlencoded".to_string(),
            body: "a=1&b=2".to_string(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["content_type"], "application/x-www-form-urlencoded");
        assert_eq!(json["body"], "a=1&b=2");
    }

    #[test]
    fn submit_echo_roundtrips_through_json() {
        let echo = SubmitEcho {
            content_type: "text/plain".to_string(),
            body: "hello".to_string(),
        };
        let json = serde_json::to_string(&echo).unwrap();
        let back: SubmitEcho = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content_type, echo.content_type);
        assert_eq!(back.body, echo.body);
    }
}
