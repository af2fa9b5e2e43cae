use crate::domain::model::{BatchResult, Record, UploadReport};
use crate::utils::error::{EtlError, Result};
use crate::utils::progress::ProgressTracker;
use reqwest::{Client, RequestBuilder, StatusCode};

/// Writes a transformed dataset to a Supabase REST table in ordered,
/// fixed-size batches. One request in flight at a time; the first
/// failed batch aborts the run. The merge-duplicates directive makes
/// every write idempotent, so the recovery action for any failure is
/// simply re-running the whole import.
pub struct BatchUploader {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BatchUploader {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Lightweight read against the target table. Runs before any write
    /// so an unreachable or misconfigured target fails the run cleanly.
    pub async fn probe(&self, table: &str) -> Result<()> {
        tracing::info!("Testing connection to {}", self.table_url(table));
        let response = self
            .authorize(self.client.get(self.table_url(table)).query(&[("limit", "1")]))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Connection probe failed. Status: {}", status);
            tracing::error!("Response: {}", body);
            return Err(EtlError::ConnectionError {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Successfully connected to table '{}'", table);
        Ok(())
    }

    /// Deletes every existing row from the table so the import starts
    /// from empty.
    pub async fn clear(&self, table: &str, primary_key: &str) -> Result<()> {
        tracing::info!("🗑️ Clearing existing rows from '{}'", table);
        let response = self
            .authorize(
                self.client
                    .delete(self.table_url(table))
                    .query(&[(primary_key, "not.is.null")]),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EtlError::ClearError {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Cleared existing rows from '{}'", table);
        Ok(())
    }

    /// Sends all records in order, at most `batch_size` rows per
    /// request. Prior batches stay committed when a later one fails;
    /// there is no rollback and no retry.
    pub async fn upload(
        &self,
        table: &str,
        records: &[Record],
        batch_size: usize,
    ) -> Result<UploadReport> {
        let total_rows = records.len();
        let total_batches = total_rows.div_ceil(batch_size);
        tracing::info!(
            "Uploading {} rows to '{}' in {} batches of up to {}",
            total_rows,
            table,
            total_batches,
            batch_size
        );

        let url = self.table_url(table);
        let mut progress = ProgressTracker::new(total_rows, total_batches);
        let mut batches = Vec::with_capacity(total_batches);

        for (index, chunk) in records.chunks(batch_size).enumerate() {
            let batch_number = index + 1;
            let response = self
                .authorize(self.client.post(&url))
                .header("Prefer", "resolution=merge-duplicates")
                .json(chunk)
                .send()
                .await?;

            let status = response.status();
            if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
                let body = response.text().await.unwrap_or_default();
                tracing::error!("❌ Failed to insert batch {}/{}", batch_number, total_batches);
                tracing::error!("Status: {}", status);
                tracing::error!("Response: {}", body);
                return Err(EtlError::BatchWriteError {
                    batch: batch_number,
                    status: status.as_u16(),
                    body,
                });
            }

            let snapshot = progress.batch_done(chunk.len());
            match snapshot.eta {
                Some(eta) => tracing::info!(
                    "✅ Batch {}/{} ({:.1}%) - {} of {} rows - ETA: {:.1}m",
                    batch_number,
                    total_batches,
                    snapshot.percent,
                    snapshot.rows_done,
                    total_rows,
                    eta.as_secs_f64() / 60.0
                ),
                None => tracing::info!(
                    "✅ Batch {}/{} ({:.1}%) - {} of {} rows",
                    batch_number,
                    total_batches,
                    snapshot.percent,
                    snapshot.rows_done,
                    total_rows
                ),
            }

            batches.push(BatchResult {
                index: batch_number,
                rows: chunk.len(),
            });
        }

        Ok(UploadReport {
            table: table.to_string(),
            rows: total_rows,
            batches,
            elapsed: progress.elapsed(),
        })
    }
}
