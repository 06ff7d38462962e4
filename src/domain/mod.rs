// IPO records and listing gains
pub mod ipo;

// Prediction features and results
pub mod ml;

// Sector taxonomy
pub mod sector;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
