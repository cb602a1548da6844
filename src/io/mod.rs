//! File-format backends: CSV ingest, PDF document writing, JSON export.

pub mod export;
pub mod ingest;
pub mod pdf;
