//! Verify parameter encoding against JSON test vectors in `test-vectors/`.
//!
//! Each vector file lists ordered key/value pairs and the exact wire form
//! they must produce. The cases run against the live mock server so the
//! assertion covers the full path: encoding, URL resolution, and the actual
//! bytes the server received.

use easyhttp_core::Client;

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

/// Parse a vector case's `params` array into owned pairs.
fn parse_params(case: &serde_json::Value) -> Vec<(String, String)> {
    case["params"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn query_encoding_vectors() {
    let raw = include_str!("../../test-vectors/query_encoding.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = parse_params(case);
        let borrowed: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let expected = case["expected_query"].as_str().unwrap();

        let body = client.get("/echo-query", &borrowed).unwrap().to_vec();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            expected,
            "{name}: query string"
        );
    }
}

#[test]
fn form_encoding_vectors() {
    let raw = include_str!("../../test-vectors/form_encoding.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let base = start_server();
    let mut client = Client::new(&base, Vec::new());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = parse_params(case);
        let borrowed: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let expected = case["expected_body"].as_str().unwrap();

        client.post("/submit", &borrowed).unwrap();
        let echo: serde_json::Value =
            serde_json::from_slice(client.body().unwrap()).unwrap();
        assert_eq!(echo["body"], *expected, "{name}: form body");
        assert_eq!(
            echo["content_type"], "application/x-www-form-urlencoded",
            "{name}: content type"
        );
    }
}
