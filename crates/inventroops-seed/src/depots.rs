//! Depot seeding through the inventory API.

use std::collections::HashSet;

use inventroops_core::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Body of `POST {api}/depots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotSeed {
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub manager: String,
}

impl DepotSeed {
    pub fn new(name: &str, location: &str, capacity: i64, manager: &str) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            capacity,
            manager: manager.to_string(),
        }
    }
}

/// The five zones the synthetic dataset places products in.
pub fn default_depot_seeds() -> Vec<DepotSeed> {
    vec![
        DepotSeed::new("North Zone", "New Delhi", 2000, "Rajesh Kumar"),
        DepotSeed::new("South Zone", "Chennai", 2000, "Suresh Reddy"),
        DepotSeed::new("East Zone", "Kolkata", 1500, "Amit Das"),
        DepotSeed::new("West Zone", "Mumbai", 2500, "Vikram Shah"),
        DepotSeed::new("Central Zone", "Nagpur", 1800, "Vijay Singh"),
    ]
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedDepotsReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Creates depots that the API does not already know by name.
pub struct DepotSeeder {
    client: Client,
    endpoint: String,
}

impl DepotSeeder {
    pub fn new(client: Client, api_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/depots", api_url.trim_end_matches('/')),
        }
    }

    pub async fn seed(&self, seeds: &[DepotSeed]) -> SeedDepotsReport {
        let mut report = SeedDepotsReport::default();
        let existing = self.existing_names().await;

        for seed in seeds {
            if existing.contains(&seed.name) {
                info!("Depot {} already exists", seed.name);
                report.skipped.push(seed.name.clone());
                continue;
            }

            match self.create(seed).await {
                Ok(()) => {
                    info!("Created {}", seed.name);
                    report.created.push(seed.name.clone());
                }
                Err(e) => {
                    warn!("Failed to create {}: {}", seed.name, e);
                    report.failed.push((seed.name.clone(), e.to_string()));
                }
            }
        }

        report
    }

    /// Names already present. Any failure is treated as "none".
    async fn existing_names(&self) -> HashSet<String> {
        let response = match self.client.get(&self.endpoint).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("Listing depots returned {}", r.status());
                return HashSet::new();
            }
            Err(e) => {
                warn!("Listing depots failed: {}", e);
                return HashSet::new();
            }
        };

        let body: Value = response.json().await.unwrap_or(Value::Null);
        depot_names(&body)
    }

    async fn create(&self, seed: &DepotSeed) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(seed)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Http(format!("API error {}: {}", status, body)))
        }
    }
}

/// Accepts a bare array or an object wrapping it under `depots` or `data`.
fn depot_names(body: &Value) -> HashSet<String> {
    let list = body
        .as_array()
        .or_else(|| body.get("depots").and_then(Value::as_array))
        .or_else(|| body.get("data").and_then(Value::as_array));

    list.into_iter()
        .flatten()
        .filter_map(|d| d.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_depot_names_shapes() {
        let names = depot_names(&json!([{"name": "North Zone"}, {"name": "East Zone"}]));
        assert!(names.contains("North Zone") && names.len() == 2);

        let names = depot_names(&json!({"depots": [{"name": "West Zone"}]}));
        assert!(names.contains("West Zone"));

        assert!(depot_names(&json!({"error": "nope"})).is_empty());
    }

    #[tokio::test]
    async fn test_seed_skips_existing_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/depots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "North Zone", "location": "New Delhi"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/depots"))
            .and(body_partial_json(json!({"name": "East Zone"})))
            .respond_with(ResponseTemplate::new(400).set_body_string("duplicate"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/depots"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let seeder = DepotSeeder::new(Client::new(), &format!("{}/api", server.uri()));
        let report = seeder.seed(&default_depot_seeds()).await;

        assert_eq!(report.skipped, ["North Zone"]);
        assert_eq!(report.created, ["South Zone", "West Zone", "Central Zone"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "East Zone");
        assert!(report.failed[0].1.starts_with("HTTP error: API error 400"));
    }

    #[tokio::test]
    async fn test_create_maps_rejection_to_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_string("exists"))
            .mount(&server)
            .await;

        let seeder = DepotSeeder::new(Client::new(), &server.uri());
        let err = seeder.create(&default_depot_seeds()[0]).await.unwrap_err();
        match err {
            Error::Http(msg) => assert!(msg.contains("409") && msg.contains("exists")),
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_listing_failure_treated_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(5)
            .mount(&server)
            .await;

        let seeder = DepotSeeder::new(Client::new(), &server.uri());
        let report = seeder.seed(&default_depot_seeds()).await;
        assert_eq!(report.created.len(), 5);
        assert!(report.skipped.is_empty());
    }
}
