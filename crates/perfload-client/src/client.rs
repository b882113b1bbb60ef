// HTTP client wrapper for the Investment Performance Calculator API

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use perfload_core::Outcome;

use crate::payloads;
use crate::spec::{Method, RequestSpec};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Bearer-authenticated access to the API. Base URL and token are immutable
/// after construction; the client is cheap to clone into workers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

/// `POST /portfolios` wraps the created entity in a `portfolio` envelope.
#[derive(Debug, Deserialize)]
struct PortfolioEnvelope {
    portfolio: CreatedEntity,
}

/// Items and transactions return a bare `{"id": ...}`.
#[derive(Debug, Deserialize)]
struct CreatedEntity {
    id: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, token, None)
    }

    /// `request_timeout` reclassifies a hung request as a transport failure
    /// after the given duration; `None` preserves unbounded waits, matching
    /// the original harness.
    pub fn with_timeout(
        base_url: &str,
        token: &str,
        request_timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: builder.build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn post_json(&self, path: &str, body: &Value) -> reqwest::RequestBuilder {
        self.http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
    }

    /// Issue one driver request and record its outcome. Transport failures
    /// become failed outcomes, never errors; the driver must keep going.
    pub async fn send(&self, spec: &RequestSpec) -> Outcome {
        let mut request = match spec.method {
            Method::Get => self.http.get(self.url(&spec.endpoint)),
            Method::Post => self.http.post(self.url(&spec.endpoint)),
        }
        .bearer_auth(&self.token)
        .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let started = Instant::now();
        match request.send().await {
            Ok(response) => Outcome::from_status(response.status().as_u16(), started.elapsed()),
            Err(err) => {
                warn!(endpoint = %spec.endpoint, error = %err, "request failed in transit");
                Outcome::transport_failure(started.elapsed())
            }
        }
    }

    /// `POST /portfolios`; 201 yields the new portfolio id, anything else
    /// drops the branch.
    pub async fn create_portfolio(&self) -> Option<String> {
        self.create_entity::<PortfolioEnvelope>("portfolios", &payloads::portfolio(), "portfolio")
            .await
            .map(|envelope| envelope.portfolio.id)
    }

    /// `POST /portfolios/{id}/items`.
    pub async fn create_item(&self, portfolio_id: &str) -> Option<String> {
        self.create_entity::<CreatedEntity>(
            &format!("portfolios/{portfolio_id}/items"),
            &payloads::item(portfolio_id),
            "item",
        )
        .await
        .map(|entity| entity.id)
    }

    /// `POST /items/{id}/transactions`.
    pub async fn create_transaction(&self, item_id: &str, portfolio_id: &str) -> Option<String> {
        self.create_entity::<CreatedEntity>(
            &format!("items/{item_id}/transactions"),
            &payloads::transaction(item_id, portfolio_id),
            "transaction",
        )
        .await
        .map(|entity| entity.id)
    }

    /// Timed `POST /calculate` for one portfolio; 200 yields the round-trip
    /// time.
    pub async fn calculate(&self, portfolio_id: &str) -> Option<Duration> {
        self.timed_post("calculate", &payloads::calculate_request(portfolio_id))
            .await
    }

    /// Timed `POST /batch-calculate` over every portfolio id.
    pub async fn batch_calculate(&self, portfolio_ids: &[String]) -> Option<Duration> {
        self.timed_post(
            "batch-calculate",
            &payloads::batch_calculate_request(portfolio_ids),
        )
        .await
    }

    async fn create_entity<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
        entity: &str,
    ) -> Option<T> {
        let response = match self.post_json(path, body).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(entity, error = %err, "creation request failed in transit");
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::CREATED {
            let detail = response.text().await.unwrap_or_default();
            warn!(entity, status = status.as_u16(), detail = %detail, "creation rejected");
            return None;
        }

        match response.json::<T>().await {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(entity, error = %err, "creation response did not parse");
                None
            }
        }
    }

    async fn timed_post(&self, path: &str, body: &Value) -> Option<Duration> {
        let started = Instant::now();
        match self.post_json(path, body).send().await {
            Ok(response) if response.status() == StatusCode::OK => Some(started.elapsed()),
            Ok(response) => {
                warn!(path, status = response.status().as_u16(), "calculation rejected");
                None
            }
            Err(err) => {
                warn!(path, error = %err, "calculation request failed in transit");
                None
            }
        }
    }
}
