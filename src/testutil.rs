//! Mock API fixtures for gateway and command tests.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ANOMALIES_JSON: &str = r#"{
    "anomalies": [
        {"userId": 1, "id": 3, "title": "ea molestias", "reason": "short_title"},
        {"userId": 2, "id": 1, "title": "sunt aut facere", "reason": "duplicate_title", "details": "Appears 2 times"},
        {"userId": 12, "id": 2, "title": "qui est esse", "reason": "bot_like_behavior"}
    ],
    "total": 3,
    "summary": {
        "total_anomalies": 3,
        "by_reason": {"short_title": 1, "duplicate_title": 1, "bot_like_behavior": 1},
        "by_user": {"1": 1, "2": 1, "12": 1},
        "unique_users_affected": 3
    }
}"#;

pub const SUMMARY_JSON: &str = r#"{
    "topUsers": [
        {"userId": 7, "uniqueWordCount": 120, "totalPosts": 10, "uniqueWords": ["alpha", "beta"]}
    ],
    "mostFrequentWords": [{"word": "rerum", "count": 81}, {"word": "est", "count": 70}],
    "totalPosts": 100,
    "totalUsers": 10
}"#;

/// Answer `GET <route>` with `status` and a JSON `body`, whatever the query.
pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

/// A mock API serving both dashboard endpoints successfully.
pub async fn dashboard_server() -> MockServer {
    let server = MockServer::start().await;
    mount_json(&server, "/api/anomalies/", 200, ANOMALIES_JSON).await;
    mount_json(&server, "/api/summary/", 200, SUMMARY_JSON).await;
    server
}

/// Path plus query of every request the server received, in arrival order.
pub async fn request_targets(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| match req.url.query() {
            Some(query) => format!("{}?{}", req.url.path(), query),
            None => req.url.path().to_string(),
        })
        .collect()
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
