//! Facade lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the client over
//! real HTTP through the default ureq engine: query encoding, form posts,
//! redirects, cookies, netrc credentials, metrics, and timeouts.

use std::io::Write;
use std::time::Duration;

use easyhttp_core::{Client, Error, InfoValue, Metric, SessionConfig};

/// Boot the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn get_status_populates_body_header_and_metrics() {
    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    assert_eq!(client.body(), None);

    let body = client.get("/status", &[]).unwrap().to_vec();
    assert_eq!(body, b"OK");
    assert_eq!(client.body(), Some(b"OK".as_slice()));
    assert!(client.answered(b"OK"));
    assert!(client.header().contains("200"));

    let info = client.info().unwrap();
    assert_eq!(info["http-code"], InfoValue::Int(200));
    assert_eq!(info["response-code"], InfoValue::Int(200));
    assert_eq!(info["size-download"], InfoValue::Int(2));
    assert!(info["effective-url"]
        .as_str()
        .unwrap()
        .ends_with("/status"));
    assert!(info["total-time"].as_float().unwrap() > 0.0);

    client.close();
    assert!(matches!(client.get("/status", &[]), Err(Error::Closed)));
}

#[test]
fn query_params_arrive_percent_encoded() {
    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    let body = client
        .get("/echo-query", &[("q", "hello world"), ("amp", "a&b")])
        .unwrap()
        .to_vec();
    assert_eq!(body, b"q=hello+world&amp=a%26b");
}

#[test]
fn post_sends_form_body_with_form_content_type() {
    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    client.post("/submit", &[("a", "1"), ("b", "2")]).unwrap();
    let echo: serde_json::Value = serde_json::from_slice(client.body().unwrap()).unwrap();
    assert_eq!(echo["body"], "a=1&b=2");
    assert_eq!(echo["content_type"], "application/x-www-form-urlencoded");
}

#[test]
fn redirects_are_followed_and_counted() {
    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    let body = client.get("/redirect", &[]).unwrap().to_vec();
    assert_eq!(body, b"OK");
    assert!(client
        .get_info(Metric::EffectiveUrl)
        .unwrap()
        .as_str()
        .unwrap()
        .ends_with("/status"));
    assert_eq!(
        client.get_info(Metric::RedirectCount).unwrap(),
        InfoValue::Int(1)
    );
}

#[test]
fn session_cookies_are_captured_and_replayed() {
    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    client.get("/set-cookie", &[]).unwrap();
    let cookies = client.get_info(Metric::CookieList).unwrap();
    assert!(cookies
        .as_list()
        .unwrap()
        .iter()
        .any(|c| c.starts_with("session=abc123")));

    client.get("/cookie-echo", &[]).unwrap();
    assert!(client.answered(b"session=abc123"));
}

#[test]
fn extra_headers_reach_the_server() {
    let base = start_server();
    let mut client = Client::new(
        &base,
        vec![("x-api-key".to_string(), "sekrit".to_string())],
    );

    client.get("/headers", &[]).unwrap();
    let headers: serde_json::Value = serde_json::from_slice(client.body().unwrap()).unwrap();
    assert_eq!(headers["x-api-key"], "sekrit");
}

#[test]
fn netrc_credentials_authenticate_the_request() {
    let base = start_server();

    let mut netrc = tempfile::NamedTempFile::new().unwrap();
    writeln!(netrc, "machine 127.0.0.1 login alice password secret").unwrap();

    let config = SessionConfig {
        netrc_path: Some(netrc.path().to_path_buf()),
        ..SessionConfig::default()
    };
    let mut client = Client::with_config(&base, Vec::new(), config);

    let body = client.get("/authed", &[]).unwrap().to_vec();
    assert_eq!(body, b"welcome");
}

#[test]
fn missing_credentials_surface_the_auth_challenge() {
    let base = start_server();
    let config = SessionConfig {
        use_netrc: false,
        ..SessionConfig::default()
    };
    let mut client = Client::with_config(&base, Vec::new(), config);

    client.get("/authed", &[]).unwrap();
    assert_eq!(
        client.get_info(Metric::HttpCode).unwrap(),
        InfoValue::Int(401)
    );
    // Basic is bit 0 of the auth mask.
    assert_eq!(
        client.get_info(Metric::HttpAuthAvail).unwrap(),
        InfoValue::Int(1)
    );
}

#[test]
fn last_modified_is_reported_as_filetime() {
    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    client.get("/modified", &[]).unwrap();
    // Wed, 21 Oct 2015 07:28:00 GMT
    assert_eq!(
        client.get_info(Metric::Filetime).unwrap(),
        InfoValue::Int(1445412480)
    );
}

#[test]
fn timeout_surfaces_as_an_engine_error() {
    let base = start_server();
    let mut client = Client::new(&base, Vec::new());
    client.set_timeout(Duration::from_millis(200)).unwrap();

    let err = client.get("/slow", &[]).unwrap_err();
    assert!(matches!(err, Error::Engine(_)));
    // A failed transfer leaves no response behind.
    assert_eq!(client.body(), None);
    assert_eq!(client.header(), "");
}
