use crate::domain::model::CosCredentials;
use crate::domain::ports::ObjectStore;
use crate::utils::error::{ImportError, Result};
use reqwest::Client;
use serde::Deserialize;

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Cloud Object Storage client over the S3-compatible HTTP API. The apikey
/// from the service binding is exchanged for a bearer token at the IAM
/// endpoint before the single get-object request is issued.
#[derive(Debug, Clone)]
pub struct CosObjectStore {
    client: Client,
    iam_endpoint: String,
    cos_endpoint: String,
    credentials: CosCredentials,
}

#[derive(Deserialize)]
struct IamToken {
    access_token: String,
}

impl CosObjectStore {
    pub fn new(iam_endpoint: String, cos_endpoint: String, credentials: CosCredentials) -> Self {
        Self {
            client: Client::new(),
            iam_endpoint,
            cos_endpoint,
            credentials,
        }
    }

    async fn bearer_token(&self) -> Result<String> {
        let response = self
            .client
            .post(&self.iam_endpoint)
            .form(&[
                ("grant_type", IAM_GRANT_TYPE),
                ("apikey", self.credentials.apikey.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImportError::AuthError {
                reason: format!("IAM endpoint returned {}", response.status()),
            });
        }
        let token: IamToken = response.json().await?;
        Ok(token.access_token)
    }
}

impl ObjectStore for CosObjectStore {
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<String> {
        tracing::info!(
            "Connecting to COS instance '{}' via endpoint {} ...",
            self.credentials.resource_instance_id,
            self.cos_endpoint
        );
        let token = self.bearer_token().await?;

        let url = format!(
            "{}/{}/{}",
            self.cos_endpoint.trim_end_matches('/'),
            bucket,
            key
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header(
                "ibm-service-instance-id",
                self.credentials.resource_instance_id.as_str(),
            )
            .send()
            .await?;

        // A failed fetch aborts the run; an object that cannot be read must
        // not be treated as an empty file.
        if !response.status().is_success() {
            return Err(ImportError::FetchError {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: format!("get-object returned {}", response.status()),
            });
        }

        let content = response.text().await?;
        tracing::debug!("received file content ({} bytes)", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn credentials() -> CosCredentials {
        CosCredentials {
            apikey: "test-apikey".to_string(),
            resource_instance_id: "crn:v1:test::".to_string(),
        }
    }

    fn store_for(server: &MockServer) -> CosObjectStore {
        CosObjectStore::new(server.url("/identity/token"), server.url(""), credentials())
    }

    #[tokio::test]
    async fn test_fetch_object_returns_body_text() {
        let server = MockServer::start();

        let token_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/identity/token")
                .body_contains("apikey=test-apikey");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({ "access_token": "bearer-123" }));
        });
        let object_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/b1/users.csv")
                .header("authorization", "Bearer bearer-123")
                .header("ibm-service-instance-id", "crn:v1:test::");
            then.status(200).body("Firstname,Lastname\nAda,Lovelace\n");
        });

        let store = store_for(&server);
        let content = store.fetch_object("b1", "users.csv").await.unwrap();

        token_mock.assert();
        object_mock.assert();
        assert_eq!(content, "Firstname,Lastname\nAda,Lovelace\n");
    }

    #[tokio::test]
    async fn test_missing_object_is_a_hard_error() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/identity/token");
            then.status(200)
                .json_body(serde_json::json!({ "access_token": "bearer-123" }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/b1/missing.csv");
            then.status(404);
        });

        let store = store_for(&server);
        let result = store.fetch_object("b1", "missing.csv").await;

        assert!(matches!(result, Err(ImportError::FetchError { .. })));
    }

    #[tokio::test]
    async fn test_rejected_apikey_aborts_before_get() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/identity/token");
            then.status(400);
        });
        let object_mock = server.mock(|when, then| {
            when.method(GET).path("/b1/users.csv");
            then.status(200).body("unreachable");
        });

        let store = store_for(&server);
        let result = store.fetch_object("b1", "users.csv").await;

        assert!(matches!(result, Err(ImportError::AuthError { .. })));
        object_mock.assert_hits(0);
    }
}
