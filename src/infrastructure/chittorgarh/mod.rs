//! Chittorgarh IPO report feed
//!
//! - `client`: HTTP adapter implementing `IpoReportSource`
//! - `report`: row-to-record mapping

pub mod client;
pub mod report;

pub use client::ChittorgarhReportClient;
