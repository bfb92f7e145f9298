//! Bulk product upload to the inventory API.

use inventroops_core::{Error, Result};
use inventroops_store::NewProduct;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

/// Totals across every chunk of one upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub chunks_sent: usize,
    pub chunks_failed: usize,
    pub success: u64,
    pub failed: u64,
}

/// Posts products in fixed-size chunks to `{api}/products/bulk`.
///
/// A chunk that errors is logged and counted; the upload moves on to the
/// next chunk. Nothing is retried.
pub struct BulkUploader {
    client: Client,
    endpoint: String,
    chunk_size: usize,
}

impl BulkUploader {
    pub fn new(client: Client, api_url: &str, chunk_size: usize) -> Self {
        Self {
            client,
            endpoint: format!("{}/products/bulk", api_url.trim_end_matches('/')),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn upload(&self, products: &[NewProduct]) -> UploadSummary {
        let mut summary = UploadSummary::default();
        info!(
            "Uploading {} products to {} in chunks of {}",
            products.len(),
            self.endpoint,
            self.chunk_size
        );

        for (index, chunk) in products.chunks(self.chunk_size).enumerate() {
            summary.chunks_sent += 1;
            let number = index + 1;
            match self.post_chunk(chunk).await {
                Ok((success, failed)) => {
                    info!("Chunk {}: Success={}, Failed={}", number, success, failed);
                    summary.success += success;
                    summary.failed += failed;
                }
                Err(e) => {
                    error!("Chunk {} ({} items) failed: {}", number, chunk.len(), e);
                    summary.chunks_failed += 1;
                    summary.failed += chunk.len() as u64;
                }
            }
        }

        info!(
            "Upload complete: success={}, failed={}, failed_chunks={}",
            summary.success, summary.failed, summary.chunks_failed
        );
        summary
    }

    async fn post_chunk(&self, chunk: &[NewProduct]) -> Result<(u64, u64)> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(chunk)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("API error {}: {}", status, body)));
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        match parse_counts(&body) {
            Some(counts) => Ok(counts),
            None => {
                warn!("Bulk response carried no counts; assuming the whole chunk was stored");
                Ok((chunk.len() as u64, 0))
            }
        }
    }
}

/// Read `{results: {success, failed}}` or a flat `{success, failed}`.
fn parse_counts(body: &Value) -> Option<(u64, u64)> {
    let counts = body.get("results").unwrap_or(body);
    let success = counts.get("success")?.as_u64()?;
    let failed = counts.get("failed").and_then(Value::as_u64).unwrap_or(0);
    Some((success, failed))
}
