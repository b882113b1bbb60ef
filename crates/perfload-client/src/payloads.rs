// Fake entity payloads for seeding test data through the API
//
// Field shapes follow what the Investment Performance Calculator endpoints
// accept; amounts and identifiers are fixed test values.

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

fn date_days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// Portfolio creation body for `POST /portfolios`.
pub fn portfolio() -> Value {
    json!({
        "name": format!("Test Portfolio {}", Uuid::new_v4()),
        "client_id": "test-client",
        "inception_date": date_days_ago(365),
        "benchmark_id": "SPY",
    })
}

/// Item creation body for `POST /portfolios/{id}/items`.
pub fn item(portfolio_id: &str) -> Value {
    json!({
        "name": format!("Test Item {}", Uuid::new_v4()),
        "description": "Test item for performance testing",
        "asset_class": "equity",
        "security_id": "AAPL",
        "portfolio_id": portfolio_id,
    })
}

/// Transaction creation body for `POST /items/{id}/transactions`.
pub fn transaction(item_id: &str, portfolio_id: &str) -> Value {
    json!({
        "transaction_type": "buy",
        "amount": 10000,
        "quantity": 100,
        "price": 100,
        "transaction_date": date_days_ago(30),
        "item_id": item_id,
        "portfolio_id": portfolio_id,
    })
}

/// Body for `POST /calculate`: trailing-year window with details.
pub fn calculate_request(portfolio_id: &str) -> Value {
    json!({
        "portfolio_id": portfolio_id,
        "start_date": date_days_ago(365),
        "end_date": date_days_ago(0),
        "include_details": true,
    })
}

/// Body for `POST /batch-calculate` over every created portfolio.
pub fn batch_calculate_request(portfolio_ids: &[String]) -> Value {
    json!({
        "portfolio_ids": portfolio_ids,
        "start_date": date_days_ago(365),
        "end_date": date_days_ago(0),
        "include_details": true,
    })
}
