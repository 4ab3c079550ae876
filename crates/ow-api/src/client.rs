//! Order fetching: the [`OrderSource`] seam and its HTTP implementation.

use async_trait::async_trait;
use ow_types::{detailed_order, Document};
use serde_json::Value;
use tracing::debug;

use crate::endpoint::{Endpoints, Locale};
use crate::error::{ApiError, ApiResult};

/// Where order data comes from.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// The account's order list, one mapping per order.
    async fn fetch_orders(&self) -> ApiResult<Vec<Document>>;

    /// The task details of one order.
    async fn fetch_order_details(&self, reference_number: &str) -> ApiResult<Document>;
}

/// Bearer-authenticated client for the vendor owner API.
#[derive(Clone, Debug)]
pub struct OwnerApiClient {
    http: reqwest::Client,
    access_token: String,
    endpoints: Endpoints,
    locale: Locale,
}

impl OwnerApiClient {
    pub fn new(http: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
            endpoints: Endpoints::default(),
            locale: Locale::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    async fn get_json(&self, url: &str) -> ApiResult<Value> {
        debug!(%url, "GET");
        let value = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl OrderSource for OwnerApiClient {
    async fn fetch_orders(&self) -> ApiResult<Vec<Document>> {
        let body = self.get_json(&self.endpoints.orders).await?;
        orders_from_response(body)
    }

    async fn fetch_order_details(&self, reference_number: &str) -> ApiResult<Document> {
        let url = self
            .endpoints
            .order_details_url(reference_number, &self.locale)?;
        let body = self.get_json(url.as_str()).await?;
        Ok(Document::from(body))
    }
}

/// Unwrap the `response` array of the orders listing.
fn orders_from_response(body: Value) -> ApiResult<Vec<Document>> {
    match Document::from(body) {
        Document::Mapping(mut map) => match map.shift_remove("response") {
            Some(Document::Sequence(orders)) => Ok(orders),
            Some(other) => Err(ApiError::UnexpectedResponse(format!(
                "orders response is a {}, expected a sequence",
                other.kind()
            ))),
            None => Err(ApiError::MissingField("response".into())),
        },
        other => Err(ApiError::UnexpectedResponse(format!(
            "orders body is a {}, expected a mapping",
            other.kind()
        ))),
    }
}

/// Fetch every order together with its details.
///
/// The result is the snapshot shape: a list of
/// `{"order": <order>, "details": <details>}` mappings in listing order.
pub async fn fetch_detailed_orders(source: &dyn OrderSource) -> ApiResult<Vec<Document>> {
    let orders = source.fetch_orders().await?;
    let mut detailed = Vec::with_capacity(orders.len());

    for order in orders {
        let reference_number = order
            .get(ow_types::order::REFERENCE_NUMBER_KEY)
            .filter(|v| !v.is_null())
            .map(Document::to_string)
            .ok_or_else(|| ApiError::MissingField(ow_types::REFERENCE_NUMBER_PATH.into()))?;
        let details = source.fetch_order_details(&reference_number).await?;
        detailed.push(detailed_order(order, details));
    }

    debug!(count = detailed.len(), "fetched detailed orders");
    Ok(detailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeSource {
        orders: Vec<Document>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl OrderSource for FakeSource {
        async fn fetch_orders(&self) -> ApiResult<Vec<Document>> {
            Ok(self.orders.clone())
        }

        async fn fetch_order_details(&self, reference_number: &str) -> ApiResult<Document> {
            self.requested.lock().unwrap().push(reference_number.to_string());
            Ok(Document::from(json!({"tasks": {"ref": reference_number}})))
        }
    }

    fn fake(orders: Value) -> FakeSource {
        let orders = match Document::from(orders) {
            Document::Sequence(items) => items,
            _ => unreachable!(),
        };
        FakeSource { orders, requested: Mutex::new(Vec::new()) }
    }

    #[tokio::test]
    async fn detailed_orders_pair_order_and_details() {
        let source = fake(json!([
            {"referenceNumber": "RN1", "orderStatus": "BOOKED"},
            {"referenceNumber": "RN2", "orderStatus": "DELIVERED"}
        ]));
        let detailed = fetch_detailed_orders(&source).await.unwrap();

        assert_eq!(detailed.len(), 2);
        assert_eq!(*source.requested.lock().unwrap(), vec!["RN1", "RN2"]);
        assert_eq!(
            detailed[1].lookup("details.tasks.ref").and_then(Document::as_str),
            Some("RN2")
        );
        assert_eq!(
            detailed[0].lookup("order.orderStatus").and_then(Document::as_str),
            Some("BOOKED")
        );
    }

    #[tokio::test]
    async fn order_without_reference_number_fails() {
        let source = fake(json!([{"orderStatus": "BOOKED"}]));
        let err = fetch_detailed_orders(&source).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingField(f) if f == "order.referenceNumber"));
    }

    #[tokio::test]
    async fn empty_order_list() {
        let source = fake(json!([]));
        assert!(fetch_detailed_orders(&source).await.unwrap().is_empty());
    }

    #[test]
    fn orders_response_unwrapping() {
        let orders = orders_from_response(json!({"response": [{"a": 1}], "count": 1})).unwrap();
        assert_eq!(orders.len(), 1);

        assert!(matches!(
            orders_from_response(json!({"count": 0})),
            Err(ApiError::MissingField(_))
        ));
        assert!(matches!(
            orders_from_response(json!({"response": {}})),
            Err(ApiError::UnexpectedResponse(_))
        ));
        assert!(matches!(
            orders_from_response(json!([])),
            Err(ApiError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn client_builder() {
        let client = OwnerApiClient::new(reqwest::Client::new(), "token")
            .with_locale(Locale { language: "de".into(), country: "AT".into() });
        assert_eq!(client.locale.country, "AT");
        assert_eq!(client.endpoints, Endpoints::default());
    }
}
