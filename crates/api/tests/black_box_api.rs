use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use stockroom_infra::{InMemoryItemStore, ItemDirectory};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let directory = ItemDirectory::start(InMemoryItemStore::new())
            .await
            .expect("failed to start directory");
        let app = stockroom_api::app::build_app(directory);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create(client: &reqwest::Client, srv: &TestServer, body: Value) -> String {
    let res = client.post(srv.url("/items")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status();
    let body = res.json().await.unwrap_or(Value::Null);
    (status, body)
}

fn timestamp(v: &Value) -> DateTime<Utc> {
    v.as_str().unwrap().parse().unwrap()
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn drill_lifecycle_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let id = create(
        &client,
        &srv,
        json!({
            "name": "Drill",
            "type": "Tool",
            "barcode": "123",
            "condition": "Good",
            "status": "Available",
        }),
    )
    .await;

    let (status, item) = get_json(&client, srv.url("/barcodes/123")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["id"], id.as_str());
    assert_eq!(item["category"], "Other");
    assert_eq!(item["is_active"], true);

    let res = client
        .post(srv.url(&format!("/items/{id}/archive")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, active) = get_json(&client, srv.url("/items?view=active")).await;
    let (_, archived) = get_json(&client, srv.url("/items?view=archived")).await;
    assert!(!ids(&active).contains(&id));
    assert!(ids(&archived).contains(&id));

    let (_, after_archive) = get_json(&client, srv.url(&format!("/items/{id}"))).await;
    assert!(timestamp(&after_archive["last_modified"]) > timestamp(&item["last_modified"]));

    let res = client
        .post(srv.url(&format!("/items/{id}/unarchive")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, active) = get_json(&client, srv.url("/items?view=active")).await;
    let (_, archived) = get_json(&client, srv.url("/items?view=archived")).await;
    assert!(ids(&active).contains(&id));
    assert!(!ids(&archived).contains(&id));
}

#[tokio::test]
async fn status_condition_and_filtered_views() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let saw = create(
        &client,
        &srv,
        json!({
            "name": "Saw",
            "type": "Tool",
            "barcode": "S-1",
            "condition": "Good",
            "status": "Available",
            "category": "Power",
        }),
    )
    .await;

    let res = client
        .put(srv.url(&format!("/items/{saw}/status")))
        .json(&json!({ "status": "Checked Out" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .put(srv.url(&format!("/items/{saw}/condition")))
        .json(&json!({ "condition": "Worn" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, checked_out) = get_json(&client, srv.url("/views/status/Checked%20Out")).await;
    assert_eq!(ids(&checked_out), vec![saw.clone()]);
    assert_eq!(checked_out[0]["condition"], "Worn");

    let (_, power) = get_json(&client, srv.url("/views/category/Power")).await;
    assert_eq!(ids(&power), vec![saw.clone()]);

    client
        .post(srv.url(&format!("/items/{saw}/archive")))
        .send()
        .await
        .unwrap();

    let (_, checked_out) = get_json(&client, srv.url("/views/status/Checked%20Out")).await;
    assert!(ids(&checked_out).is_empty());
    let (_, tools) = get_json(&client, srv.url("/views/type/Tool")).await;
    assert!(ids(&tools).is_empty());
    let (_, all_tools) = get_json(&client, srv.url("/views/type/Tool?active_only=false")).await;
    assert_eq!(ids(&all_tools), vec![saw]);
}

#[tokio::test]
async fn full_update_and_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let id = create(
        &client,
        &srv,
        json!({
            "name": "Ladder",
            "type": "Equipment",
            "barcode": "L-1",
            "condition": "Good",
            "status": "Available",
        }),
    )
    .await;
    let (_, before) = get_json(&client, srv.url(&format!("/items/{id}"))).await;

    let res = client
        .put(srv.url(&format!("/items/{id}")))
        .json(&json!({
            "name": "Step ladder",
            "type": "Equipment",
            "barcode": "L-1",
            "condition": "Fair",
            "status": "Available",
            "category": "Access",
            "photo_path": "photos/ladder.jpg",
            "is_active": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, item) = get_json(&client, srv.url(&format!("/items/{id}"))).await;
    assert_eq!(item["name"], "Step ladder");
    assert_eq!(item["category"], "Access");
    assert_eq!(item["photo_path"], "photos/ladder.jpg");
    // No last_modified in the body: the stored timestamp is kept.
    assert_eq!(timestamp(&item["last_modified"]), timestamp(&before["last_modified"]));

    for _ in 0..2 {
        let res = client.delete(srv.url(&format!("/items/{id}"))).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    let (status, body) = get_json(&client, srv.url(&format!("/items/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn errors_are_json() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, srv.url("/items/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");

    let (status, body) = get_json(&client, srv.url("/barcodes/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let res = client
        .post(srv.url("/items"))
        .json(&json!({
            "name": " ",
            "type": "Tool",
            "barcode": "1",
            "condition": "Good",
            "status": "Available",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_input");

    let (status, body) = get_json(&client, srv.url("/items?view=sideways")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_view");
}

#[tokio::test]
async fn item_stream_pushes_snapshots() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut stream = client
        .get(srv.url("/stream/items?view=active"))
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    // First event: the (empty) current view.
    let first = read_event(&mut stream).await;
    assert!(first.contains("event: items"));
    assert!(first.contains("data: []"));

    let id = create(
        &client,
        &srv,
        json!({
            "name": "Drill",
            "type": "Tool",
            "barcode": "123",
            "condition": "Good",
            "status": "Available",
        }),
    )
    .await;

    let second = read_event(&mut stream).await;
    assert!(second.contains(&id));
}

#[tokio::test]
async fn failure_stream_reports_rejected_writes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut stream = client.get(srv.url("/stream/failures")).send().await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    let res = client
        .post(srv.url("/items"))
        .json(&json!({
            "name": "",
            "type": "Tool",
            "barcode": "F-1",
            "condition": "Good",
            "status": "Available",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let event = read_event(&mut stream).await;
    assert!(event.contains("event: failure"));
    assert!(event.contains(r#""operation":"create""#));
    assert!(event.contains(r#""error":"invalid_input""#));
    assert!(event.contains(r#""item_id":null"#));

    let id = create(
        &client,
        &srv,
        json!({
            "name": "Clamp",
            "type": "Tool",
            "barcode": "F-2",
            "condition": "Good",
            "status": "Available",
        }),
    )
    .await;
    let res = client
        .put(srv.url(&format!("/items/{id}")))
        .json(&json!({
            "name": "Clamp",
            "type": "Tool",
            "barcode": " ",
            "condition": "Good",
            "status": "Available",
            "category": "Other",
            "is_active": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let event = read_event(&mut stream).await;
    assert!(event.contains("event: failure"));
    assert!(event.contains(r#""operation":"update""#));
    assert!(event.contains(&id));
}

/// Read chunks until one full SSE event (blank-line terminated) arrives.
async fn read_event(res: &mut reqwest::Response) -> String {
    let mut buf = String::new();
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    while !buf.contains("\n\n") {
        let chunk = tokio::time::timeout_at(deadline, res.chunk())
            .await
            .expect("timed out waiting for SSE event")
            .unwrap()
            .expect("stream ended");
        buf.push_str(&String::from_utf8_lossy(&chunk));
    }
    buf
}
