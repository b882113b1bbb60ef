// End-to-end flows against a mock API: the seed dependency chain, the
// load-test drive path, and failure handling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use perfload_client::{
    run_load_test, run_seed, ApiClient, LoadTestConfig, RequestSpec, SeedConfig,
};
use perfload_core::{DriverConfig, Pacing, RunState};

const TOKEN: &str = "test-token";

/// Responds 201 with an incrementing id, optionally wrapped in the
/// `portfolio` envelope the portfolios endpoint uses.
struct IncrementingId {
    prefix: &'static str,
    envelope: bool,
    counter: AtomicU64,
}

impl IncrementingId {
    fn new(prefix: &'static str, envelope: bool) -> Self {
        Self {
            prefix,
            envelope,
            counter: AtomicU64::new(0),
        }
    }
}

impl Respond for IncrementingId {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let id = format!("{}{}", self.prefix, self.counter.fetch_add(1, Ordering::SeqCst));
        let body = if self.envelope {
            json!({ "portfolio": { "id": id } })
        } else {
            json!({ "id": id })
        };
        ResponseTemplate::new(201).set_body_json(body)
    }
}

/// Derives the item id from the portfolio in the request path, so tests can
/// verify that transactions land under the item's actual parent.
struct ItemIdFromPath;

impl Respond for ItemIdFromPath {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let portfolio_id = request
            .url
            .path()
            .trim_start_matches("/portfolios/")
            .trim_end_matches("/items")
            .to_string();
        ResponseTemplate::new(201).set_body_json(json!({ "id": format!("item-of-{portfolio_id}") }))
    }
}

fn driver_config(rate: u32, duration_secs: u32, concurrency: usize) -> DriverConfig {
    DriverConfig {
        rate,
        duration_secs,
        concurrency,
        pacing: Pacing::WallClock,
        deadline: None,
    }
}

async fn mount_entity_mocks(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/portfolios/[^/]+/items$"))
        .respond_with(ItemIdFromPath)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/items/[^/]+/transactions$"))
        .respond_with(IncrementingId::new("t", false))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/batch-calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn seed_builds_the_full_entity_chain() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/portfolios"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(IncrementingId::new("p", true))
        .expect(2)
        .mount(&server)
        .await;
    mount_entity_mocks(&server).await;

    let client = ApiClient::new(&server.uri(), TOKEN).unwrap();
    let config = SeedConfig {
        portfolios: 2,
        items_per_portfolio: 1,
        transactions_per_item: 1,
        concurrency: 2,
    };
    let report = run_seed(&client, &config).await;

    assert_eq!(report.portfolios, 2);
    assert_eq!(report.items, 2);
    assert_eq!(report.transactions, 2);
    assert_eq!(report.individual_calculation.count, 2);
    assert!(report.individual_calculation.avg_duration.is_some());
    assert!(report.batch_calculation.duration.is_some());

    let requests = server.received_requests().await.unwrap();
    let calculate_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/calculate")
        .count();
    let batch_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/batch-calculate")
        .count();
    assert_eq!(calculate_calls, 2);
    assert_eq!(batch_calls, 1);
}

#[tokio::test]
async fn items_keep_their_source_portfolio() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/portfolios"))
        .respond_with(IncrementingId::new("p", true))
        .mount(&server)
        .await;
    mount_entity_mocks(&server).await;

    let client = ApiClient::new(&server.uri(), TOKEN).unwrap();
    let config = SeedConfig {
        portfolios: 3,
        items_per_portfolio: 2,
        transactions_per_item: 1,
        concurrency: 3,
    };
    let report = run_seed(&client, &config).await;
    assert_eq!(report.transactions, 6);

    // Every transaction must be posted under the item's actual parent
    // portfolio, not whichever portfolio happened to be created last.
    let requests = server.received_requests().await.unwrap();
    let mut checked = 0;
    for request in requests
        .iter()
        .filter(|r| r.url.path().ends_with("/transactions"))
    {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let item_id = body["item_id"].as_str().unwrap();
        let portfolio_id = body["portfolio_id"].as_str().unwrap();
        assert_eq!(item_id, format!("item-of-{portfolio_id}"));
        assert_eq!(request.url.path(), format!("/items/{item_id}/transactions"));
        checked += 1;
    }
    assert_eq!(checked, 6);
}

#[tokio::test]
async fn failed_portfolio_creation_drops_only_that_branch() {
    let server = MockServer::start().await;

    // The first portfolio creation fails; the remaining two succeed.
    Mock::given(method("POST"))
        .and(path("/portfolios"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/portfolios"))
        .respond_with(IncrementingId::new("p", true))
        .mount(&server)
        .await;
    mount_entity_mocks(&server).await;

    let client = ApiClient::new(&server.uri(), TOKEN).unwrap();
    let config = SeedConfig {
        portfolios: 3,
        items_per_portfolio: 1,
        transactions_per_item: 1,
        concurrency: 1,
    };
    let report = run_seed(&client, &config).await;

    assert_eq!(report.portfolios, 2);
    assert_eq!(report.items, 2);
    assert_eq!(report.transactions, 2);
    assert_eq!(report.individual_calculation.count, 2);
}

#[tokio::test]
async fn load_test_drives_the_configured_request_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/portfolios"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "portfolios": [] })))
        .expect(20)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), TOKEN).unwrap();
    let spec = RequestSpec::get("portfolios");
    let config = LoadTestConfig {
        driver: driver_config(20, 1, 5),
        show_progress: false,
    };
    let (summary, report) = run_load_test(&client, &spec, &config).await.unwrap();

    assert_eq!(summary.total_requests, 20);
    assert_eq!(summary.success_rate, 100.0);
    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.submitted, 20);
    assert!(summary.response_time.min <= summary.response_time.p50);
    assert!(summary.response_time.p50 <= summary.response_time.p99);
}

#[tokio::test]
async fn post_drive_sends_the_configured_body() {
    let server = MockServer::start().await;
    let body = json!({ "portfolio_id": "p1", "include_details": true });

    Mock::given(method("POST"))
        .and(path("/calculate"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), TOKEN).unwrap();
    let spec = RequestSpec::post("calculate", Some(body.clone()));
    let config = LoadTestConfig {
        driver: driver_config(2, 1, 2),
        show_progress: false,
    };
    let (summary, _) = run_load_test(&client, &spec, &config).await.unwrap();
    assert_eq!(summary.total_requests, 2);
    assert_eq!(summary.success_rate, 100.0);
}

#[tokio::test]
async fn server_errors_become_failed_outcomes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), TOKEN).unwrap();
    let outcome = client.send(&RequestSpec::get("broken")).await;

    assert_eq!(outcome.status, Some(500));
    assert!(!outcome.success);
}

#[tokio::test]
async fn transport_errors_become_failed_outcomes() {
    // Grab a port, then free it so the connection is refused. A dedicated
    // (non-pooled) server is required: pooled servers keep listening after
    // drop and would answer 404 instead of refusing the connection.
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let client = ApiClient::new(&uri, TOKEN).unwrap();
    let outcome = client.send(&RequestSpec::get("portfolios")).await;

    assert_eq!(outcome.status, None);
    assert!(!outcome.success);
}

#[tokio::test]
async fn request_timeout_is_reclassified_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client =
        ApiClient::with_timeout(&server.uri(), TOKEN, Some(Duration::from_millis(200))).unwrap();
    let outcome = client.send(&RequestSpec::get("slow")).await;

    assert_eq!(outcome.status, None);
    assert!(!outcome.success);
    assert!(outcome.elapsed < Duration::from_secs(5));
}
