pub mod chittorgarh;
pub mod core;
pub mod observability;
pub mod repositories;

pub use chittorgarh::ChittorgarhReportClient;
pub use repositories::{InMemoryHistoricalIpoRepository, InMemoryIpoRepository};
