//! HTTP implementation of [`TransactionGateway`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use stockhub_catalog::{Category, Product, Salesman};
use stockhub_core::{Money, ProductId, SalesmanId, TransactionId};
use stockhub_transactions::{SubmitRequest, TransactionKind, TransactionRecord};

use crate::config::ClientConfig;
use crate::gateway::{FieldErrors, GatewayError, SubmitAck, TransactionGateway};

pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// List endpoints answer either with a bare array or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { data: items } => items,
        }
    }
}

/// Transaction row as listed by `/purchases` and `/sales`; the kind is
/// implied by the route.
#[derive(Deserialize)]
struct RecordRow {
    id: TransactionId,
    product_id: ProductId,
    quantity: u64,
    unit_price: Money,
    #[serde(default)]
    total: Option<Money>,
    date: NaiveDate,
    #[serde(default)]
    salesman_id: Option<SalesmanId>,
}

impl RecordRow {
    fn into_record(self, kind: TransactionKind) -> TransactionRecord {
        let mut record = TransactionRecord::new(
            self.id,
            kind,
            self.product_id,
            self.quantity,
            self.unit_price,
            self.date,
        );
        if let Some(total) = self.total {
            record.total = total;
        }
        record.salesman_id = self.salesman_id;
        record
    }
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, GatewayError> {
        let resp = self
            .authorized(req.header("Accept", "application/json"))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        debug!(url = %resp.url(), status = resp.status().as_u16(), "backend responded");
        Ok(resp)
    }

    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GatewayError> {
        let resp = self.send(self.client.get(self.url(path))).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Api(
                status.as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }
        let listing: Listing<T> = resp
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;
        Ok(listing.into_vec())
    }
}

#[async_trait]
impl TransactionGateway for HttpGateway {
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitAck, GatewayError> {
        let url = self.url(&request.path());
        let resp = self
            .send(self.client.post(&url).json(&request.body()))
            .await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(SubmitAck {
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }

        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
            let fields = FieldErrors::from_body(&body);
            if !fields.is_empty() {
                return Err(GatewayError::Rejected(fields));
            }
        }
        Err(GatewayError::Api(status.as_u16(), text))
    }

    async fn products(&self) -> Result<Vec<Product>, GatewayError> {
        let products: Vec<Product> = self.list("products").await?;
        for product in &products {
            product.check()?;
        }
        Ok(products)
    }

    async fn categories(&self) -> Result<Vec<Category>, GatewayError> {
        let categories: Vec<Category> = self.list("categories").await?;
        for category in &categories {
            category.check()?;
        }
        Ok(categories)
    }

    async fn salesmen(&self) -> Result<Vec<Salesman>, GatewayError> {
        let salesmen: Vec<Salesman> = self.list("salesmen").await?;
        for salesman in &salesmen {
            salesman.check()?;
        }
        Ok(salesmen)
    }

    async fn transactions(&self, kind: TransactionKind) -> Result<Vec<TransactionRecord>, GatewayError> {
        let rows: Vec<RecordRow> = self.list(kind.resource()).await?;
        Ok(rows.into_iter().map(|r| r.into_record(kind)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_accepts_both_shapes() {
        let bare: Listing<u32> = serde_json::from_value(json!([1, 2])).unwrap();
        let wrapped: Listing<u32> = serde_json::from_value(json!({"data": [3]})).unwrap();
        assert_eq!(bare.into_vec(), [1, 2]);
        assert_eq!(wrapped.into_vec(), [3]);
    }

    #[test]
    fn record_rows_fill_in_missing_totals() {
        let row: RecordRow = serde_json::from_value(json!({
            "id": 4, "product_id": 2, "quantity": 3, "unit_price": 500, "date": "2024-05-01"
        }))
        .unwrap();
        let record = row.into_record(TransactionKind::Sale);
        assert_eq!(record.total, Money::new(1500));
        assert_eq!(record.kind, TransactionKind::Sale);
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let config = ClientConfig {
            api_url: "http://localhost:8000/api/".into(),
            ..ClientConfig::default()
        };
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.url("/sales/bulk"), "http://localhost:8000/api/sales/bulk");
    }
}
