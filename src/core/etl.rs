use crate::domain::model::UploadReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives the three pipeline stages in order, logging stage boundaries
/// and, when enabled, process resource usage.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<UploadReport> {
        tracing::info!("Starting import process...");

        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", raw_data.len());
        self.monitor.log_stats("extract");

        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!("Transformed {} records", transformed.len());
        self.monitor.log_stats("transform");

        let report = self.pipeline.load(transformed).await?;
        tracing::info!(
            "Imported {} rows to '{}' in {} batches ({:.1}s)",
            report.rows,
            report.table,
            report.batches.len(),
            report.elapsed.as_secs_f64()
        );
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(report)
    }
}
