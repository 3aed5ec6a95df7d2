use crate::core::decoder;
use crate::core::writer::RecordWriter;
use crate::domain::model::{BatchReport, Record, TriggerEvent};
use crate::domain::ports::{ImportPipeline, ObjectStore, SqlExecutor};
use crate::utils::error::Result;

/// Production pipeline: one object fetched from COS, decoded as CSV, written
/// through the record writer.
pub struct CsvImportPipeline<S: ObjectStore, E: SqlExecutor> {
    store: S,
    writer: RecordWriter<E>,
    bucket: String,
    key: String,
}

impl<S: ObjectStore, E: SqlExecutor> CsvImportPipeline<S, E> {
    pub fn new(store: S, writer: RecordWriter<E>, event: &TriggerEvent) -> Self {
        Self {
            store,
            writer,
            bucket: event.bucket.clone(),
            key: event.key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl<S: ObjectStore, E: SqlExecutor> ImportPipeline for CsvImportPipeline<S, E> {
    async fn fetch(&self) -> Result<String> {
        self.store.fetch_object(&self.bucket, &self.key).await
    }

    async fn decode(&self, content: String) -> Result<Vec<Record>> {
        decoder::decode_records(&content)
    }

    async fn write(&self, records: Vec<Record>) -> Result<BatchReport> {
        self.writer.write_batch(&records).await
    }
}

/// Drives the pipeline stages in order. Each stage's output is the next
/// stage's sole input and any stage error aborts the run.
pub struct ImportEngine<P: ImportPipeline> {
    pipeline: P,
}

impl<P: ImportPipeline> ImportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<BatchReport> {
        tracing::info!("Retrieving file content ...");
        let content = self.pipeline.fetch().await?;
        tracing::info!("received {} bytes", content.len());

        tracing::info!("Converting CSV data to records ...");
        let records = self.pipeline.decode(content).await?;
        tracing::info!("decoded {} records", records.len());

        tracing::info!("Writing records to the database ...");
        let report = self.pipeline.write(records).await?;
        tracing::info!("inserted {} of {} records", report.inserted, report.total);

        Ok(report)
    }
}
