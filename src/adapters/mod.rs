// Adapters layer: concrete implementations for external systems (CSV files, blob storage).

pub mod csv_export;
pub mod csv_source;
pub mod storage;
