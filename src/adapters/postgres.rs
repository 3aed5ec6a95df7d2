use crate::domain::ports::SqlExecutor;
use crate::utils::error::{ImportError, Result};
use rustls::RootCertStore;
use tokio_postgres::types::ToSql;
use tokio_postgres::Client;
use tokio_postgres_rustls::MakeRustlsConnect;

/// One TLS connection to PostgreSQL, opened once per jobrun and dropped at
/// process exit. Not pooled.
pub struct PgExecutor {
    client: Client,
}

impl PgExecutor {
    /// `ca_cert_pem` is the decoded CA certificate material; the server
    /// certificate must chain to it.
    pub async fn connect(uri: &str, ca_cert_pem: &[u8]) -> Result<Self> {
        let tls = make_tls_connect(ca_cert_pem)?;
        let pg_config: tokio_postgres::Config = uri.parse()?;

        let (client, connection) = pg_config.connect(tls).await?;
        tracing::info!("established PostgreSQL client connection");

        // The connection task drives the wire protocol and finishes when the
        // client is dropped.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }
}

fn make_tls_connect(ca_cert_pem: &[u8]) -> Result<MakeRustlsConnect> {
    let mut roots = RootCertStore::empty();
    let mut reader = ca_cert_pem;
    for cert in rustls_pemfile::certs(&mut reader) {
        roots.add(cert?)?;
    }
    if roots.is_empty() {
        return Err(ImportError::ConfigError {
            message: "no CA certificate found in the supplied PEM material".to_string(),
        });
    }

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(MakeRustlsConnect::new(tls_config.into()))
}

impl SqlExecutor for PgExecutor {
    async fn execute(&self, statement: &str, params: &[&str]) -> Result<u64> {
        let sql_params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Ok(self.client.execute(statement, &sql_params).await?)
    }
}
