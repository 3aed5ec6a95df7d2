pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::cos::CosObjectStore;
pub use adapters::postgres::PgExecutor;
pub use config::JobConfig;
pub use core::importer::{CsvImportPipeline, ImportEngine};
pub use core::writer::RecordWriter;
pub use utils::error::{ImportError, Result};
