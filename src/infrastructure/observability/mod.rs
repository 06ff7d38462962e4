//! Pull-free observability for ipotrack
//!
//! Counters and gauges live in a local Prometheus registry. Commands render the
//! registry in text format to the log on exit; nothing listens for requests.

pub mod metrics;

pub use metrics::Metrics;
