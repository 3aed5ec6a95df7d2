use csv_sql_import::core::event::validate_trigger;
use csv_sql_import::utils::{logger, validation::Validate};
use csv_sql_import::{
    CosObjectStore, CsvImportPipeline, ImportEngine, ImportError, JobConfig, PgExecutor,
    RecordWriter,
};

#[tokio::main]
async fn main() {
    // reqwest and tokio-postgres both pull in rustls; pin one process-wide
    // crypto provider before either builds a TLS config.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    logger::init_job_logger();
    tracing::info!("Starting CSV to SQL conversion ...");

    let config = match JobConfig::from_env() {
        Ok(config) => config,
        Err(e) => abort(e),
    };
    if let Err(e) = config.validate() {
        abort(e);
    }

    let (event, credentials) = match validate_trigger(
        config.event_payload.as_deref(),
        config.service_bindings.as_deref(),
    ) {
        Ok(validated) => validated,
        Err(e) => abort(e),
    };

    let ca_cert = match config.ca_cert_pem() {
        Ok(pem) => pem,
        Err(e) => abort(e),
    };

    tracing::info!("Establishing connection to PostgreSQL database ...");
    let executor = match PgExecutor::connect(&config.postgres_uri, &ca_cert).await {
        Ok(executor) => executor,
        Err(e) => abort(e),
    };

    let store = CosObjectStore::new(
        config.iam_endpoint.clone(),
        config.cos_endpoint.clone(),
        credentials,
    );
    let writer = RecordWriter::new(executor, config.transactional);
    let pipeline = CsvImportPipeline::new(store, writer, &event);

    match ImportEngine::new(pipeline).run().await {
        Ok(report) => {
            tracing::info!(
                "✅ COMPLETED - imported {} records from '{}'",
                report.inserted,
                event.key
            );
        }
        Err(e) => {
            tracing::error!("❌ FAILED - {}", e);
            std::process::exit(1);
        }
    }
}

fn abort(e: ImportError) -> ! {
    tracing::error!("< ABORT - {}", e);
    std::process::exit(1);
}
