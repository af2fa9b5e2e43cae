use crate::domain::model::{Dataset, UploadReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn csv_path(&self) -> &str;
    fn base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    /// Overrides the schema's table name when set.
    fn table_override(&self) -> Option<&str>;
    /// Overrides the schema's default batch size when set.
    fn batch_size_override(&self) -> Option<usize>;
    fn clear_before_import(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<Dataset>;
    async fn load(&self, data: Dataset) -> Result<UploadReport>;
}
