//! Core services: classification, top-K tracking, traversal, aggregation and log analysis

pub mod aggregate;
pub mod classify;
pub mod format;
pub mod log_analysis;
pub mod top_k;
pub mod traverse;
