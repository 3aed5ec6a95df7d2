use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use base64::engine::general_purpose;
use base64::Engine;
use std::env;

pub const DEFAULT_COS_ENDPOINT: &str = "https://s3.ca-tor.cloud-object-storage.appdomain.cloud";
pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.cloud.ibm.com/identity/token";

/// Everything the job reads from its environment, gathered once at startup.
/// The stages only ever see this struct, never the environment itself.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Raw `CE_DATA` JSON. Absence is legal here; the event validator
    /// rejects it with a diagnostic.
    pub event_payload: Option<String>,
    /// Raw `CE_SERVICES` JSON.
    pub service_bindings: Option<String>,
    pub cos_endpoint: String,
    pub iam_endpoint: String,
    pub postgres_uri: String,
    pub postgres_ca_cert_base64: String,
    /// When set, the batch insert runs as one all-or-nothing transaction
    /// instead of the default best-effort import.
    pub transactional: bool,
}

impl JobConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            event_payload: env::var("CE_DATA").ok(),
            service_bindings: env::var("CE_SERVICES").ok(),
            cos_endpoint: env::var("COS_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_COS_ENDPOINT.to_string()),
            iam_endpoint: env::var("IAM_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_IAM_ENDPOINT.to_string()),
            postgres_uri: env::var("POSTGRE_URI").map_err(|_| {
                ImportError::MissingConfigError {
                    field: "POSTGRE_URI".to_string(),
                }
            })?,
            postgres_ca_cert_base64: env::var("POSTGRE_CACERT_BASE64").map_err(|_| {
                ImportError::MissingConfigError {
                    field: "POSTGRE_CACERT_BASE64".to_string(),
                }
            })?,
            transactional: env::var("IMPORT_TRANSACTIONAL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    /// Decodes `POSTGRE_CACERT_BASE64` into PEM bytes.
    pub fn ca_cert_pem(&self) -> Result<Vec<u8>> {
        Ok(general_purpose::STANDARD.decode(&self.postgres_ca_cert_base64)?)
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        validate_url("cos_endpoint", &self.cos_endpoint)?;
        validate_url("iam_endpoint", &self.iam_endpoint)?;
        validate_non_empty_string("postgres_uri", &self.postgres_uri)?;
        validate_non_empty_string("postgres_ca_cert_base64", &self.postgres_ca_cert_base64)?;
        Ok(())
    }
}
