pub mod annotations;
pub mod merge;
pub mod persistence;
pub mod row_store;
pub mod state;
pub mod view;

pub use crate::domain::model::{Annotation, ColumnSet, ParsedFile, Row, RowIndex};
pub use crate::domain::ports::{BlobStore, ConfigProvider, ImportSource};
pub use crate::utils::error::Result;
