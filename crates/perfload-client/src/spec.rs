// Immutable description of the request a load-test run repeats

use serde_json::Value;

/// HTTP method supported by the driver. The harness only ever issues GET
/// and POST against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// The request dispatched for every driver submission. Constructed once per
/// run and shared read-only across workers.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Endpoint path relative to the API base URL
    pub endpoint: String,
    pub method: Method,
    /// JSON body, POST only
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Get,
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Post,
            body,
        }
    }
}
