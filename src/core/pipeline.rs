use crate::core::transform;
use crate::core::uploader::BatchUploader;
use crate::domain::model::{Dataset, Record, UploadReport};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::schema::TableSchema;
use crate::utils::error::Result;
use serde_json::{Map, Value};

/// CSV-to-REST import pipeline: extract reads the CSV through the
/// storage port, transform reshapes rows to the table schema, load
/// probes the target and writes batches through the uploader.
pub struct ImportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    schema: TableSchema,
    uploader: BatchUploader,
}

impl<S: Storage, C: ConfigProvider> ImportPipeline<S, C> {
    pub fn new(storage: S, config: C, schema: TableSchema) -> Self {
        let uploader = BatchUploader::new(config.base_url(), config.api_key());
        Self {
            storage,
            config,
            schema,
            uploader,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ImportPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        tracing::info!("Loading CSV data from: {}", self.config.csv_path());
        let bytes = self.storage.read_file(self.config.csv_path()).await?;

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        // Header identifiers are kept verbatim; renaming happens in
        // the transform stage.
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut data = Map::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                data.insert(header.to_string(), Value::String(cell.to_string()));
            }
            records.push(Record { data });
        }

        tracing::info!("Loaded {} rows from CSV", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Dataset) -> Result<Dataset> {
        let transformed = transform::apply(data, &self.schema)?;
        tracing::info!(
            "Transformed {} records for table '{}'",
            transformed.len(),
            self.schema.table
        );
        Ok(transformed)
    }

    async fn load(&self, data: Dataset) -> Result<UploadReport> {
        let table = self.config.table_override().unwrap_or(&self.schema.table);
        let batch_size = self
            .config
            .batch_size_override()
            .unwrap_or(self.schema.batch_size);

        self.uploader.probe(table).await?;

        if self.config.clear_before_import() {
            self.uploader.clear(table, &self.schema.primary_key).await?;
        }

        self.uploader.upload(table, &data, batch_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }
    }

    struct MockConfig {
        csv_path: String,
        base_url: String,
    }

    impl MockConfig {
        fn new(csv_path: &str) -> Self {
            Self {
                csv_path: csv_path.to_string(),
                base_url: "http://localhost:1".to_string(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn csv_path(&self) -> &str {
            &self.csv_path
        }

        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn api_key(&self) -> &str {
            "test-key"
        }

        fn table_override(&self) -> Option<&str> {
            None
        }

        fn batch_size_override(&self) -> Option<usize> {
            None
        }

        fn clear_before_import(&self) -> bool {
            false
        }
    }

    fn test_schema() -> TableSchema {
        TableSchema::from_toml(
            r#"
table = "games"
primary_key = "game_id"
batch_size = 500

date_columns = ["game_date"]
columns = ["game_id", "player_team", "game_date", "goals_for"]
integer_columns = ["goals_for"]

[rename]
gameId = "game_id"
playerTeam = "player_team"
gameDate = "game_date"
goalsFor = "goals_for"
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_extract_preserves_rows_and_headers() {
        let storage = MockStorage::new();
        storage
            .put_file(
                "games.csv",
                b"gameId,playerTeam,gameDate,goalsFor\n\
                  2024020001,DAL,20240115,3\n\
                  2024020002,DAL,20240117,1\n",
            )
            .await;

        let pipeline = ImportPipeline::new(storage, MockConfig::new("games.csv"), test_schema());
        let records = pipeline.extract().await.unwrap();

        assert_eq!(records.len(), 2);
        // Source identifiers verbatim, cells loaded as strings.
        let keys: Vec<&str> = records[0].data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["gameId", "playerTeam", "gameDate", "goalsFor"]);
        assert_eq!(
            records[0].data["gameId"],
            serde_json::Value::String("2024020001".to_string())
        );
        assert_eq!(
            records[1].data["gameDate"],
            serde_json::Value::String("20240117".to_string())
        );
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let pipeline = ImportPipeline::new(
            MockStorage::new(),
            MockConfig::new("missing.csv"),
            test_schema(),
        );

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_malformed_csv() {
        let storage = MockStorage::new();
        // Second row is short one field.
        storage
            .put_file("bad.csv", b"gameId,playerTeam,goalsFor\n1,DAL\n")
            .await;

        let pipeline = ImportPipeline::new(storage, MockConfig::new("bad.csv"), test_schema());
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::CsvError(_)));
    }

    #[tokio::test]
    async fn test_extract_header_only_csv_is_empty_dataset() {
        let storage = MockStorage::new();
        storage
            .put_file("empty.csv", b"gameId,playerTeam,gameDate,goalsFor\n")
            .await;

        let pipeline = ImportPipeline::new(storage, MockConfig::new("empty.csv"), test_schema());
        let records = pipeline.extract().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_transform_reshapes_extracted_rows() {
        let storage = MockStorage::new();
        storage
            .put_file(
                "games.csv",
                b"gameId,playerTeam,gameDate,goalsFor,extra\n\
                  2024020001,DAL,20240115,3,ignored\n",
            )
            .await;

        let pipeline = ImportPipeline::new(storage, MockConfig::new("games.csv"), test_schema());
        let raw = pipeline.extract().await.unwrap();
        let out = pipeline.transform(raw).await.unwrap();

        let keys: Vec<&str> = out[0].data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["game_id", "player_team", "game_date", "goals_for"]);
        assert_eq!(
            out[0].data["game_date"],
            serde_json::Value::String("2024-01-15".to_string())
        );
    }
}
