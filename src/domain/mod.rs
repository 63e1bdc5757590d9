// Market data domain
pub mod market;

// Feature registry shared between training and inference
pub mod ml;

// Return-series risk metrics
pub mod performance;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
