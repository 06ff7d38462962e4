//! Prometheus metrics definitions for ipotrack
//!
//! All metrics use the `ipotrack_` prefix and are read-only.

use prometheus::{
    CounterVec, Gauge, GaugeVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge, GenericGaugeVec},
};
use std::sync::Arc;

/// Prometheus metrics for the IPO pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Predictions by path (model, fallback, failed)
    pub predictions_total: CounterVec,
    /// Sector classifications by resulting label
    pub classifications_total: CounterVec,
    /// Report rows processed by report and status
    pub ingest_rows_total: CounterVec,
    /// Tracked IPO records by status
    pub ipos_tracked: GenericGaugeVec<AtomicF64>,
    /// 1 when a trained model is loaded, 0 on fallback
    pub model_loaded: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new("ipotrack_predictions_total", "Listing-gain predictions by path"),
            &["path"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let classifications_total = CounterVec::new(
            Opts::new(
                "ipotrack_classifications_total",
                "Sector classifications by resulting sector",
            ),
            &["sector"],
        )?;
        registry.register(Box::new(classifications_total.clone()))?;

        let ingest_rows_total = CounterVec::new(
            Opts::new(
                "ipotrack_ingest_rows_total",
                "Report rows processed by report and status",
            ),
            &["report", "status"],
        )?;
        registry.register(Box::new(ingest_rows_total.clone()))?;

        let ipos_tracked = GaugeVec::new(
            Opts::new("ipotrack_ipos_tracked", "Tracked IPO records by status"),
            &["status"],
        )?;
        registry.register(Box::new(ipos_tracked.clone()))?;

        let model_loaded = Gauge::with_opts(Opts::new(
            "ipotrack_model_loaded",
            "Trained gain model loaded (1) or fallback formula (0)",
        ))?;
        registry.register(Box::new(model_loaded.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            classifications_total,
            ingest_rows_total,
            ipos_tracked,
            model_loaded,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_predictions(&self, path: &str) {
        self.predictions_total.with_label_values(&[path]).inc();
    }

    pub fn inc_classifications(&self, sector: &str) {
        self.classifications_total.with_label_values(&[sector]).inc();
    }

    pub fn inc_ingest_rows(&self, report: &str, status: &str) {
        self.ingest_rows_total
            .with_label_values(&[report, status])
            .inc();
    }

    pub fn set_ipos_tracked(&self, status: &str, count: usize) {
        self.ipos_tracked
            .with_label_values(&[status])
            .set(count as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.model_loaded.set(1.0);
        assert!(metrics.render().contains("ipotrack_model_loaded 1"));
    }

    #[test]
    fn test_prediction_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_predictions("fallback");
        metrics.inc_predictions("fallback");
        metrics.inc_predictions("failed");
        let output = metrics.render();
        assert!(output.contains("ipotrack_predictions_total{path=\"fallback\"} 2"));
        assert!(output.contains("ipotrack_predictions_total{path=\"failed\"} 1"));
    }

    #[test]
    fn test_ingest_and_classification_labels() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_ingest_rows("historical", "created");
        metrics.inc_classifications("Energy");
        metrics.set_ipos_tracked("upcoming", 4);
        let output = metrics.render();
        assert!(output.contains("ipotrack_ingest_rows_total"));
        assert!(output.contains("Energy"));
        assert!(output.contains("ipotrack_ipos_tracked{status=\"upcoming\"} 4"));
    }
}
