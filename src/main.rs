use clap::Parser;
use puckload::utils::{logger, validation::Validate};
use puckload::{CliConfig, EtlEngine, ImportPipeline, LocalStorage, TableSchema};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting puckload");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let schema = match &config.schema_file {
        Some(path) => TableSchema::from_path(path),
        None => TableSchema::builtin(config.dataset),
    };
    let schema = match schema {
        Ok(schema) => schema,
        Err(e) => {
            tracing::error!("❌ Failed to load table schema: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = ImportPipeline::new(storage, config, schema);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            println!("✅ Data import completed successfully!");
            println!(
                "📊 {} rows in {} batches to '{}' ({:.1}s)",
                report.rows,
                report.batches.len(),
                report.table,
                report.elapsed.as_secs_f64()
            );
        }
        Err(e) => {
            tracing::error!("❌ Import process failed: {}", e);
            eprintln!("❌ Data import failed: {}", e);
            std::process::exit(1);
        }
    }
}
