pub mod decoder;
pub mod event;
pub mod importer;
pub mod writer;

pub use crate::domain::model::{BatchReport, CosCredentials, Record, TriggerEvent};
pub use crate::domain::ports::{ImportPipeline, ObjectStore, SqlExecutor};
pub use crate::utils::error::Result;
