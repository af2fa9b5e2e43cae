pub mod etl;
pub mod pipeline;
pub mod transform;
pub mod uploader;

pub use crate::domain::model::{Dataset, Record, UploadReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
