pub mod batch;
pub mod controller;

pub use batch::ImportBatch;
pub use controller::ChecklistApp;
