use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use std::time::{Duration, Instant};

pub mod auth;
pub mod error;
pub mod order;
pub mod responses;

// --- Public API ---
pub use order::{OrderDraft, SignedOrder, generate_out_order_no};
pub use responses::{CreateOrderResponse, OrderData};

/// Path of the order-creation endpoint, relative to the gateway root.
pub const ORDERS_PATH: &str = "/api/v1/orders";
/// How long to wait for the gateway before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The interface the probe uses to talk to a payment gateway.
/// Kept as a trait so the transport can be swapped out in tests.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Where orders are posted, for display.
    fn endpoint(&self) -> String;

    /// Submits a signed order-creation request and returns whatever came back.
    ///
    /// Any HTTP status counts as a completed exchange; only transport-level
    /// failures are errors.
    async fn create_order(&self, order: &SignedOrder) -> Result<OrderExchange, ApiError>;
}

/// What came back from one completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct OrderExchange {
    pub url: String,
    pub status: StatusCode,
    pub elapsed: Duration,
    pub body: String,
}

impl OrderExchange {
    /// Parses the body into the expected response shape.
    pub fn parse(&self) -> Result<CreateOrderResponse, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// The body re-indented for display, if it is JSON at all.
    pub fn pretty_body(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        serde_json::to_string_pretty(&value).ok()
    }

    /// A 2xx status and a business `code` of 200.
    pub fn is_success(&self, response: &CreateOrderResponse) -> bool {
        self.status.is_success() && response.is_success()
    }
}

/// An `OrderApi` backed by a real HTTP gateway.
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("order-probe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn orders_url(&self) -> String {
        format!("{}{}", self.base_url, ORDERS_PATH)
    }
}

#[async_trait]
impl OrderApi for GatewayClient {
    fn endpoint(&self) -> String {
        self.orders_url()
    }

    async fn create_order(&self, order: &SignedOrder) -> Result<OrderExchange, ApiError> {
        let url = self.orders_url();
        let body = serde_json::to_string(order.params())?;
        tracing::debug!(%url, bytes = body.len(), "Posting order.");

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        let elapsed = started.elapsed();

        tracing::info!(
            %url,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Order request completed."
        );

        Ok(OrderExchange {
            url,
            status,
            elapsed,
            body: text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(status: u16, body: &str) -> OrderExchange {
        OrderExchange {
            url: "http://localhost/api/v1/orders".to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            elapsed: Duration::from_millis(5),
            body: body.to_string(),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GatewayClient::new("http://localhost:8888/").unwrap();
        assert_eq!(client.orders_url(), "http://localhost:8888/api/v1/orders");
    }

    #[test]
    fn success_needs_both_status_and_code() {
        let ok = exchange(200, r#"{"code":200}"#);
        assert!(ok.is_success(&ok.parse().unwrap()));

        let rejected = exchange(200, r#"{"code":400,"message":"bad sign"}"#);
        assert!(!rejected.is_success(&rejected.parse().unwrap()));

        let server_error = exchange(500, r#"{"code":200}"#);
        assert!(!server_error.is_success(&server_error.parse().unwrap()));
    }

    #[test]
    fn non_json_body_fails_to_parse() {
        let html = exchange(502, "<html>Bad Gateway</html>");
        assert!(matches!(html.parse(), Err(ApiError::Deserialization(_))));
        assert!(html.pretty_body().is_none());
    }

    #[test]
    fn pretty_body_reindents_json() {
        let ok = exchange(200, r#"{"code":200}"#);
        assert_eq!(ok.pretty_body().unwrap(), "{\n  \"code\": 200\n}");
    }
}
