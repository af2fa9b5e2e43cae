use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// One row, keyed by field name. The map preserves insertion order so
/// transformed records serialize with the schema's declared column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self { data: Map::new() }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

pub type Dataset = Vec<Record>;

/// Outcome of one successfully written batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// 1-based position in the upload sequence.
    pub index: usize,
    pub rows: usize,
}

/// Outcome of a completed run. A failed batch never appears here; it
/// surfaces as `EtlError::BatchWriteError` and aborts the run.
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub table: String,
    pub rows: usize,
    pub batches: Vec<BatchResult>,
    pub elapsed: Duration,
}
