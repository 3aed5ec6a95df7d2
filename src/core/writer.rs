use crate::domain::model::{BatchReport, Record};
use crate::domain::ports::SqlExecutor;
use crate::utils::error::{ImportError, Result};
use futures::future::join_all;

pub const ENSURE_TABLE_SQL: &str =
    "CREATE TABLE IF NOT EXISTS users (firstname varchar(256) NOT NULL, lastname varchar(256) NOT NULL)";
pub const INSERT_SQL: &str = "INSERT INTO users(firstname,lastname) VALUES($1, $2)";

pub const FIRSTNAME_FIELD: &str = "Firstname";
pub const LASTNAME_FIELD: &str = "Lastname";

/// Writes decoded records into the `users` table through a [`SqlExecutor`].
///
/// The table is ensured before any insert is dispatched. Inserts for distinct
/// records are independent: all of them are dispatched together and awaited
/// as one batch, with no ordering guarantee between them.
pub struct RecordWriter<E: SqlExecutor> {
    executor: E,
    transactional: bool,
}

impl<E: SqlExecutor> RecordWriter<E> {
    pub fn new(executor: E, transactional: bool) -> Self {
        Self {
            executor,
            transactional,
        }
    }

    pub async fn write_batch(&self, records: &[Record]) -> Result<BatchReport> {
        self.executor.execute(ENSURE_TABLE_SQL, &[]).await?;
        tracing::debug!("user table ensured");

        if self.transactional {
            self.write_transactional(records).await
        } else {
            self.write_best_effort(records).await
        }
    }

    /// Default mode: every row is tried, failures are collected at the batch
    /// level and rows that already made it in stay in.
    async fn write_best_effort(&self, records: &[Record]) -> Result<BatchReport> {
        let outcomes = self.dispatch_inserts(records).await;

        let mut report = BatchReport {
            total: records.len(),
            ..Default::default()
        };
        for (outcome, record) in outcomes.iter().zip(records) {
            match outcome {
                Ok(_) => {
                    report.inserted += 1;
                    tracing::info!("added {:?}", record.fields);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!("failed to add a row to the database: {}", e);
                }
            }
        }

        if report.failed > 0 {
            return Err(ImportError::BatchError {
                failed: report.failed,
                total: report.total,
            });
        }
        Ok(report)
    }

    /// All-or-nothing mode: the batch runs inside one transaction and any
    /// failure rolls the whole import back.
    async fn write_transactional(&self, records: &[Record]) -> Result<BatchReport> {
        self.executor.execute("BEGIN", &[]).await?;
        let outcomes = self.dispatch_inserts(records).await;

        let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
        if failed > 0 {
            for e in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
                tracing::error!("failed to add a row to the database: {}", e);
            }
            self.executor.execute("ROLLBACK", &[]).await?;
            return Err(ImportError::BatchError {
                failed,
                total: records.len(),
            });
        }

        self.executor.execute("COMMIT", &[]).await?;
        Ok(BatchReport {
            total: records.len(),
            inserted: records.len(),
            failed: 0,
        })
    }

    async fn dispatch_inserts(&self, records: &[Record]) -> Vec<Result<u64>> {
        let inserts = records.iter().enumerate().map(|(idx, record)| async move {
            let first = record
                .get(FIRSTNAME_FIELD)
                .ok_or_else(|| ImportError::RecordError {
                    row: idx + 1,
                    field: FIRSTNAME_FIELD.to_string(),
                })?;
            let last = record
                .get(LASTNAME_FIELD)
                .ok_or_else(|| ImportError::RecordError {
                    row: idx + 1,
                    field: LASTNAME_FIELD.to_string(),
                })?;
            self.executor.execute(INSERT_SQL, &[first, last]).await
        });
        join_all(inserts).await
    }
}
