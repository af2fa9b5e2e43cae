pub mod config;
pub mod core;
pub mod domain;
pub mod schema;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig};
pub use core::{etl::EtlEngine, pipeline::ImportPipeline, uploader::BatchUploader};
pub use domain::model::{BatchResult, Dataset, Record, UploadReport};
pub use schema::{DatasetKind, TableSchema};
pub use utils::error::{EtlError, Result};
