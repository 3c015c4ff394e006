use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use spindle_api::app;
use spindle_infra::cache::InMemoryListingCache;
use spindle_infra::enrichment::MusicBrainzClient;
use spindle_infra::order_store::InMemoryOrderStore;
use spindle_infra::record_store::InMemoryRecordStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over in-memory backends, bound to an
        // ephemeral port. The enrichment endpoint points at a closed port
        // so no test ever leaves the machine.
        let services = Arc::new(app::services::build_with(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(InMemoryListingCache::new()),
            Arc::new(MusicBrainzClient::with_base_url("http://127.0.0.1:1")),
        ));
        let router = app::build_router(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn vinyl_record(artist: &str, album: &str, qty: i64) -> serde_json::Value {
    json!({
        "artist": artist,
        "album": album,
        "price_cents": 2999,
        "qty": qty,
        "format": "VINYL",
        "category": "ROCK",
    })
}

async fn create_record(
    client: &reqwest::Client,
    base_url: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/records", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn record_lifecycle_create_get_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_record(
        &client,
        &srv.base_url,
        vinyl_record("The Beatles", "Abbey Road", 10),
    )
    .await;
    assert_eq!(created["status"], json!(true));
    assert_eq!(created["message"], json!("Record created successfully"));
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Fetch it back.
    let res = client
        .get(format!("{}/records/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["data"]["artist"], json!("The Beatles"));
    assert_eq!(fetched["data"]["qty"], json!(10));

    // Patch the price.
    let res = client
        .put(format!("{}/records/{}", srv.base_url, id))
        .json(&json!({ "price_cents": 3499 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["price_cents"], json!(3499));

    // Delete, then a second fetch is 404.
    let res = client
        .delete(format!("{}/records/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/records/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], json!("not_found"));
}

#[tokio::test]
async fn duplicate_record_is_rejected_with_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_record(
        &client,
        &srv.base_url,
        vinyl_record("The Beatles", "Abbey Road", 10),
    )
    .await;

    let res = client
        .post(format!("{}/records", srv.base_url))
        .json(&vinyl_record("The Beatles", "Abbey Road", 3))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], json!("duplicate_record"));
}

#[tokio::test]
async fn listing_filters_artist_by_full_field_equality() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_record(
        &client,
        &srv.base_url,
        vinyl_record("The Beatles", "Abbey Road", 10),
    )
    .await;
    create_record(
        &client,
        &srv.base_url,
        vinyl_record("The Beatles Tribute", "Abbey Road Live", 5),
    )
    .await;

    let res = client
        .get(format!(
            "{}/records?artist=the%20beatles&page=1&limit=10",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    let records = body["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["artist"], json!("The Beatles"));
    assert_eq!(body["data"]["pagination"]["total_records"], json!(1));
}

#[tokio::test]
async fn order_flow_deducts_stock_and_reports_availability() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_record(
        &client,
        &srv.base_url,
        vinyl_record("The Beatles", "Abbey Road", 10),
    )
    .await;
    let record_id = created["data"]["id"].as_str().unwrap().to_string();

    // Order 2 of 10.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "record_id": record_id, "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["data"]["quantity"], json!(2));
    assert_eq!(order["data"]["status"], json!("PENDING"));
    let order_id = order["data"]["id"].as_str().unwrap().to_string();

    // Stock dropped to 8.
    let res = client
        .get(format!("{}/records/{}", srv.base_url, record_id))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["data"]["qty"], json!(8));

    // Ordering 20 fails and names the 8 units still available.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "record_id": record_id, "quantity": 20 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], json!("insufficient_stock"));
    assert_eq!(err["message"], json!("insufficient stock: only 8 left"));

    // Stock unchanged; exactly one order on file.
    let res = client
        .get(format!("{}/records/{}", srv.base_url, record_id))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["data"]["qty"], json!(8));

    let res = client
        .get(format!("{}/orders", srv.base_url))
        .send()
        .await
        .unwrap();
    let orders: serde_json::Value = res.json().await.unwrap();
    assert_eq!(orders["data"].as_array().unwrap().len(), 1);

    // The order can be fetched by id.
    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn ordering_an_unknown_record_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "record_id": "0188b2a0-5c3f-7000-8000-000000000000",
            "quantity": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_rejected_up_front() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/records/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], json!("invalid_id"));
}
