//! Client and transport configuration.

use std::path::PathBuf;

use crate::error::{AisError, Result};

/// Polling behavior of the signing client.
#[derive(Debug, Clone)]
pub struct AisClientConfig {
    /// Seconds to wait between status polls.
    pub polling_interval_secs: u64,
    /// Number of polls before the operation counts as timed out.
    pub polling_rounds: u32,
}

impl Default for AisClientConfig {
    fn default() -> Self {
        Self {
            polling_interval_secs: 10,
            polling_rounds: 10,
        }
    }
}

impl AisClientConfig {
    pub fn with_polling_interval_secs(mut self, secs: u64) -> Self {
        self.polling_interval_secs = secs;
        self
    }

    pub fn with_polling_rounds(mut self, rounds: u32) -> Self {
        self.polling_rounds = rounds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=300).contains(&self.polling_interval_secs) {
            return Err(AisError::Validation(
                "The polling_interval_secs parameter of the client configuration \
                 must be between 1 and 300 seconds"
                    .to_string(),
            ));
        }
        if !(1..=100).contains(&self.polling_rounds) {
            return Err(AisError::Validation(
                "The polling_rounds parameter of the client configuration \
                 must be between 1 and 100 rounds"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection settings of the REST transport.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Endpoint for signing submissions.
    pub sign_url: String,
    /// Endpoint for pending-status polls.
    pub pending_url: String,
    /// PEM file with the client certificate for mutual TLS.
    pub client_certificate_file: Option<PathBuf>,
    /// PEM file with the matching unencrypted private key.
    pub client_key_file: Option<PathBuf>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Idle connections kept per host.
    pub max_connections: usize,
    /// Accept any server certificate. Intended for test environments only.
    pub skip_server_certificate_validation: bool,
}

impl RestConfig {
    pub fn new(sign_url: impl Into<String>, pending_url: impl Into<String>) -> Self {
        Self {
            sign_url: sign_url.into(),
            pending_url: pending_url.into(),
            client_certificate_file: None,
            client_key_file: None,
            request_timeout_secs: 90,
            max_connections: 20,
            skip_server_certificate_validation: false,
        }
    }

    /// Configure mutual TLS from a certificate and key PEM file pair.
    pub fn with_client_certificate(
        mut self,
        certificate_file: impl Into<PathBuf>,
        key_file: impl Into<PathBuf>,
    ) -> Self {
        self.client_certificate_file = Some(certificate_file.into());
        self.client_key_file = Some(key_file.into());
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_skip_server_certificate_validation(mut self, skip: bool) -> Self {
        self.skip_server_certificate_validation = skip;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sign_url.trim().is_empty() {
            return Err(AisError::Validation(
                "The sign_url parameter of the REST configuration cannot be empty".to_string(),
            ));
        }
        if self.pending_url.trim().is_empty() {
            return Err(AisError::Validation(
                "The pending_url parameter of the REST configuration cannot be empty".to_string(),
            ));
        }
        if !(2..=100).contains(&self.request_timeout_secs) {
            return Err(AisError::Validation(
                "The request_timeout_secs parameter of the REST configuration \
                 must be between 2 and 100"
                    .to_string(),
            ));
        }
        if !(2..=100).contains(&self.max_connections) {
            return Err(AisError::Validation(
                "The max_connections parameter of the REST configuration \
                 must be between 2 and 100"
                    .to_string(),
            ));
        }
        if self.client_certificate_file.is_some() != self.client_key_file.is_some() {
            return Err(AisError::Validation(
                "The client certificate and key files of the REST configuration \
                 must be provided together"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
