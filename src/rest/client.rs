//! HTTP transport towards the signing service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Identity};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RestConfig;
use crate::error::{AisError, Result};
use crate::rest::model::{PendingRequestEnvelope, SignRequestEnvelope, SignResponseEnvelope};

const SIGN_OPERATION: &str = "SignRequest";
const PENDING_OPERATION: &str = "PendingRequest";

/// Seam between the protocol orchestration and the HTTP layer. Both
/// endpoints answer with the same response envelope.
#[async_trait]
pub trait SignatureTransport: Send + Sync {
    /// Submits the initial signing request.
    async fn request_signature(
        &self,
        request: &SignRequestEnvelope,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope>;

    /// Polls the status of an asynchronous signing request.
    async fn poll_signature_status(
        &self,
        request: &PendingRequestEnvelope,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope>;
}

/// Transport that talks JSON over HTTPS, authenticating with the client
/// certificate when one is configured.
#[derive(Debug)]
pub struct RestClient {
    config: RestConfig,
    client: Client,
}

impl RestClient {
    /// Validates the configuration and builds the underlying HTTP client
    /// once; connections are pooled across requests.
    pub fn new(config: RestConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_max_idle_per_host(config.max_connections);

        if let (Some(certificate_file), Some(key_file)) =
            (&config.client_certificate_file, &config.client_key_file)
        {
            builder = builder.identity(load_identity(certificate_file, key_file)?);
        }
        if config.skip_server_certificate_validation {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| AisError::Validation(format!("The HTTP client could not be built: {e}")))?;

        Ok(Self { config, client })
    }

    async fn execute<T: Serialize>(
        &self,
        payload: &T,
        url: &str,
        operation: &str,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope> {
        let body = serde_json::to_string(payload)?;
        info!(operation, url, trace_id, "sending request");
        debug!(operation, content = %body, trace_id, "request payload");

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AisError::Transport {
                trace_id: trace_id.to_string(),
                source: e,
            })?;

        let status = response.status();
        info!(operation, status = status.as_u16(), trace_id, "received HTTP status");
        let text = response.text().await.map_err(|e| AisError::Transport {
            trace_id: trace_id.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(AisError::UnexpectedStatus {
                trace_id: trace_id.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(operation, content = %text, trace_id, "response payload");
        Ok(serde_json::from_str(&text)?)
    }
}

/// Loads a rustls identity from a PEM key and certificate file pair.
fn load_identity(certificate_file: &Path, key_file: &Path) -> Result<Identity> {
    let mut pem = std::fs::read(key_file).map_err(|e| {
        AisError::Validation(format!(
            "The client key file [{}] could not be read: {e}",
            key_file.display()
        ))
    })?;
    let certificate = std::fs::read(certificate_file).map_err(|e| {
        AisError::Validation(format!(
            "The client certificate file [{}] could not be read: {e}",
            certificate_file.display()
        ))
    })?;
    pem.extend_from_slice(&certificate);
    Identity::from_pem(&pem).map_err(|e| {
        AisError::Validation(format!("The client certificate could not be loaded: {e}"))
    })
}

#[async_trait]
impl SignatureTransport for RestClient {
    async fn request_signature(
        &self,
        request: &SignRequestEnvelope,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope> {
        self.execute(request, &self.config.sign_url, SIGN_OPERATION, trace_id)
            .await
    }

    async fn poll_signature_status(
        &self,
        request: &PendingRequestEnvelope,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope> {
        self.execute(
            request,
            &self.config.pending_url,
            PENDING_OPERATION,
            trace_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_configuration() {
        let err = RestClient::new(RestConfig::new("", "")).unwrap_err();
        assert!(matches!(err, AisError::Validation(_)));
    }

    #[test]
    fn rejects_unreadable_certificate_files() {
        let config = RestConfig::new("https://example.com/sign", "https://example.com/pending")
            .with_client_certificate("/nonexistent/client.crt", "/nonexistent/client.key");
        let err = RestClient::new(config).unwrap_err();
        assert!(matches!(err, AisError::Validation(_)));
    }

    #[test]
    fn builds_without_client_certificate() {
        let config = RestConfig::new("https://example.com/sign", "https://example.com/pending");
        assert!(RestClient::new(config).is_ok());
    }
}
