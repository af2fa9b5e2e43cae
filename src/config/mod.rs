pub mod cli;

use crate::domain::ports::ConfigProvider;
use crate::schema::DatasetKind;
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "puckload")]
#[command(about = "Batch-load hockey stats CSVs into a Supabase table")]
pub struct CliConfig {
    /// CSV file to import
    #[arg(long)]
    pub csv_path: String,

    /// Built-in table schema to apply
    #[arg(long, value_enum, default_value_t = DatasetKind::Games)]
    pub dataset: DatasetKind,

    /// Custom schema file (takes precedence over --dataset)
    #[arg(long)]
    pub schema_file: Option<String>,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub base_url: String,

    /// Service role key used for both apikey and bearer headers
    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Rows per write request (schema default when omitted)
    #[arg(long, env = "BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Target table (schema default when omitted)
    #[arg(long)]
    pub table: Option<String>,

    /// Delete existing rows before importing
    #[arg(long)]
    pub clear: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU/memory usage per stage")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn csv_path(&self) -> &str {
        &self.csv_path
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn table_override(&self) -> Option<&str> {
        self.table.as_deref()
    }

    fn batch_size_override(&self) -> Option<usize> {
        self.batch_size
    }

    fn clear_before_import(&self) -> bool {
        self.clear
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("csv_path", &self.csv_path)?;
        validate_file_extensions("csv_path", std::slice::from_ref(&self.csv_path), &["csv"])?;
        validate_url("base_url", &self.base_url)?;
        validate_non_empty_string("api_key", &self.api_key)?;

        if let Some(batch_size) = self.batch_size {
            validate_positive_number("batch_size", batch_size, 1)?;
        }

        if let Some(schema_file) = &self.schema_file {
            validate_path("schema_file", schema_file)?;
            validate_file_extensions("schema_file", std::slice::from_ref(schema_file), &["toml"])?;
        }

        if let Some(table) = &self.table {
            validate_non_empty_string("table", table)?;
        }

        Ok(())
    }
}
