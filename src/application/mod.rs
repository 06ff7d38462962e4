// Listing-gain prediction and model loading
pub mod ml;

// Keyword sector classification
pub mod sector_classifier;

// Record creation and read views
pub mod listing_service;

// Report ingestion
pub mod ingest_service;
