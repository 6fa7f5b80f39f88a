pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::csv_source::{FileSource, InMemorySource};
pub use adapters::storage::{FileBlobStore, MemoryBlobStore};
pub use app::{ChecklistApp, ImportBatch};
pub use config::TomlConfig;
pub use domain::model::{
    Annotation, IdentityKey, ImportSummary, IngestionPolicy, Row, RowIndex, SortDirection,
};
pub use utils::error::{ChecklistError, Result};
