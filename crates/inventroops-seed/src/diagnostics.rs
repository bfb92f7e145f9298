//! Health checks for the store and the two REST APIs.

use inventroops_core::Result;
use inventroops_store::{Product, SqliteStore, StoreStats};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// How much of a response body to keep in a report.
const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreReport {
    pub stats: StoreStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Product>,
}

/// Collection names, counts and one sample product.
pub fn check_store(store: &SqliteStore) -> Result<StoreReport> {
    let stats = store.get_stats()?;
    info!("Collections: {:?}", stats.tables);
    info!("Product count: {}", stats.total_products);

    let sample = store.first_product()?;
    match &sample {
        Some(p) => info!("Sample product: Name: {}, Location: {}", p.name, p.location),
        None => info!("No products found in 'products' collection"),
    }

    Ok(StoreReport { stats, sample })
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryApiCheck {
    pub url: String,
    pub status: Option<u16>,
    pub body_preview: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastApiCheck {
    pub url: String,
    pub status: Option<u16>,
    pub success: Option<bool>,
    pub count: Option<i64>,
    pub products_len: Option<usize>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    pub inventory: InventoryApiCheck,
    pub forecast: ForecastApiCheck,
}

/// Probe `GET {api}/products?limit=1` and `GET {ml_api}/ml/products`.
pub async fn check_apis(client: &Client, api_url: &str, ml_api_url: &str) -> ApiReport {
    ApiReport {
        inventory: check_inventory(client, api_url).await,
        forecast: check_forecast(client, ml_api_url).await,
    }
}

async fn check_inventory(client: &Client, api_url: &str) -> InventoryApiCheck {
    let url = format!("{}/products?limit=1", api_url.trim_end_matches('/'));
    info!("Checking inventory API at {}", url);
    let mut check = InventoryApiCheck {
        url,
        ..Default::default()
    };

    match client.get(&check.url).send().await {
        Ok(response) => {
            check.status = Some(response.status().as_u16());
            let body = response.text().await.unwrap_or_default();
            check.body_preview = body.chars().take(BODY_PREVIEW_CHARS).collect();
            info!("Status: {:?}", check.status);
        }
        Err(e) => {
            warn!("Inventory API unreachable: {}", e);
            check.error = Some(e.to_string());
        }
    }
    check
}

async fn check_forecast(client: &Client, ml_api_url: &str) -> ForecastApiCheck {
    let url = format!("{}/ml/products", ml_api_url.trim_end_matches('/'));
    info!("Checking forecast API at {}", url);
    let mut check = ForecastApiCheck {
        url,
        ..Default::default()
    };

    let response = match client.get(&check.url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("Forecast API unreachable: {}", e);
            check.error = Some(e.to_string());
            return check;
        }
    };

    check.status = Some(response.status().as_u16());
    match response.json::<Value>().await {
        Ok(body) => {
            check.success = body.get("success").and_then(Value::as_bool);
            check.count = body.get("count").and_then(Value::as_i64);
            check.products_len = body
                .get("products")
                .and_then(Value::as_array)
                .map(Vec::len);
            info!(
                "Success: {:?}, Count: {:?}, Products length: {:?}",
                check.success, check.count, check.products_len
            );
        }
        Err(e) => {
            warn!("Forecast API returned a non-JSON body: {}", e);
            check.error = Some(e.to_string());
        }
    }
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventroops_store::NewProduct;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_check_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        let report = check_store(&store).unwrap();
        assert_eq!(report.stats.total_products, 0);
        assert!(report.sample.is_none());
    }

    #[test]
    fn test_check_store_sample() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        store
            .add_product(&NewProduct {
                sku: "SKU001".into(),
                name: "Mouse North 1".into(),
                location: "North Zone".into(),
                ..Default::default()
            })
            .unwrap();

        let report = check_store(&store).unwrap();
        assert_eq!(report.stats.total_products, 1);
        assert_eq!(report.sample.unwrap().location, "North Zone");
    }

    #[tokio::test]
    async fn test_check_apis() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(500)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ml/api/ml/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "count": 2,
                "products": [{"sku": "SKU001"}, {"sku": "SKU002"}]
            })))
            .mount(&server)
            .await;

        let client = Client::new();
        let report = check_apis(
            &client,
            &format!("{}/api", server.uri()),
            &format!("{}/ml/api", server.uri()),
        )
        .await;

        assert_eq!(report.inventory.status, Some(200));
        assert_eq!(report.inventory.body_preview.len(), 200);
        assert_eq!(report.forecast.success, Some(true));
        assert_eq!(report.forecast.count, Some(2));
        assert_eq!(report.forecast.products_len, Some(2));
    }

    #[tokio::test]
    async fn test_unreachable_apis_reported() {
        let client = Client::new();
        let report = check_apis(&client, "http://127.0.0.1:9/api", "http://127.0.0.1:9/api").await;
        assert!(report.inventory.error.is_some());
        assert!(report.inventory.status.is_none());
        assert!(report.forecast.error.is_some());
    }
}
