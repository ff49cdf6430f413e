//! Signing orchestration.
//!
//! [`AisClient`] drives one signing operation end to end: validate the
//! intent, hash the documents, submit the request, walk the step-up
//! polling loop when the mode needs it, classify the terminal response
//! and hand each returned signature back to the document preparer.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, error, info};

use crate::config::AisClientConfig;
use crate::consent::{ConsentNotifier, ConsentObserver};
use crate::document::{DocumentPreparer, PreparedDocument};
use crate::error::{AisError, Result};
use crate::model::{SignatureMode, SignatureOutcome, SigningIntent};
use crate::rest::builder;
use crate::rest::client::SignatureTransport;
use crate::rest::codes::{ResultMajorCode, ResultMessageCode, ResultMinorCode};
use crate::rest::model::SignResponseEnvelope;

const MISSING_MSISDN_MESSAGE: &str = "<MSISDN> is missing";

/// Client for the remote signing service.
///
/// Generic over the transport and the document preparer so tests can swap
/// in doubles. One instance serves any number of concurrent operations;
/// all per-operation state lives on the stack of [`sign`](Self::sign).
pub struct AisClient<T: SignatureTransport, D: DocumentPreparer> {
    config: AisClientConfig,
    transport: Arc<T>,
    preparer: Arc<D>,
}

impl<T: SignatureTransport, D: DocumentPreparer> AisClient<T, D> {
    /// Validates the configuration and builds the client.
    pub fn new(config: AisClientConfig, transport: Arc<T>, preparer: Arc<D>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            preparer,
        })
    }

    /// Runs a signing operation without a consent observer. Step-up modes
    /// will log a warning if the service asks for consent.
    pub async fn sign(&self, intent: &SigningIntent) -> Result<SignatureOutcome> {
        self.sign_with_observer(intent, None).await
    }

    /// Runs a signing operation, forwarding any step-up consent URL to the
    /// given observer.
    ///
    /// Returns the user-level outcome of the operation; infrastructure and
    /// protocol failures surface as errors instead.
    pub async fn sign_with_observer(
        &self,
        intent: &SigningIntent,
        observer: Option<Arc<dyn ConsentObserver>>,
    ) -> Result<SignatureOutcome> {
        let trace_id = intent.transaction_id.as_str();
        intent.validate()?;
        let notifier = ConsentNotifier::new(observer);

        let mut prepared: Vec<PreparedDocument> = Vec::with_capacity(intent.documents.len());
        for source in &intent.documents {
            info!(
                mode = intent.mode.friendly_name(),
                input_file = %source.input_file.display(),
                trace_id,
                "preparing document for signing"
            );
            match self
                .preparer
                .prepare(source, intent.signature_type(), trace_id)
                .await
            {
                Ok(document) => prepared.push(document),
                Err(e) => {
                    self.release_documents(&prepared).await;
                    return Err(e);
                }
            }
        }

        let outcome = self.drive_signing(intent, &prepared, &notifier, trace_id).await;
        self.release_documents(&prepared).await;
        outcome
    }

    async fn drive_signing(
        &self,
        intent: &SigningIntent,
        prepared: &[PreparedDocument],
        notifier: &ConsentNotifier,
        trace_id: &str,
    ) -> Result<SignatureOutcome> {
        let request = builder::build_sign_request(intent, prepared);
        info!(
            mode = intent.mode.friendly_name(),
            documents = prepared.len(),
            trace_id,
            "requesting signature"
        );
        let mut response = self.transport.request_signature(&request, trace_id).await?;

        if intent.with_step_up() {
            if !response.is_pending() {
                return classify_outcome(&response, trace_id);
            }
            response = self
                .poll_until_complete(response, intent, notifier, trace_id)
                .await?;
        }
        if !response.is_major_success() {
            return classify_outcome(&response, trace_id);
        }

        self.finish_documents(intent, prepared, &response, trace_id)
            .await?;
        Ok(SignatureOutcome::Success)
    }

    /// Polls the pending endpoint until the response leaves the pending
    /// state or the configured rounds run out. The response returned last
    /// is the terminal one either way.
    async fn poll_until_complete(
        &self,
        initial: SignResponseEnvelope,
        intent: &SigningIntent,
        notifier: &ConsentNotifier,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope> {
        let mut response = initial;
        let interval = Duration::from_secs(self.config.polling_interval_secs);

        if response.consent_url().is_some() {
            notifier.process(&response, trace_id);
            tokio::time::sleep(interval).await;
        }

        for round in 0..self.config.polling_rounds {
            debug!(
                round = round + 1,
                rounds = self.config.polling_rounds,
                trace_id,
                "polling for signature status"
            );
            let async_response_id =
                response
                    .async_response_id()
                    .ok_or_else(|| AisError::Protocol {
                        trace_id: trace_id.to_string(),
                        summary: format!(
                            "Pending response carries no async response id: {}",
                            response.result_summary()
                        ),
                    })?;
            let pending_request = builder::build_pending_request(async_response_id, intent);
            response = self
                .transport
                .poll_signature_status(&pending_request, trace_id)
                .await?;
            notifier.process(&response, trace_id);
            if response.is_pending() {
                tokio::time::sleep(interval).await;
            } else {
                break;
            }
        }
        Ok(response)
    }

    async fn finish_documents(
        &self,
        intent: &SigningIntent,
        prepared: &[PreparedDocument],
        response: &SignResponseEnvelope,
        trace_id: &str,
    ) -> Result<()> {
        let single_document = prepared.len() == 1;
        let timestamp = intent.mode == SignatureMode::Timestamp;
        info!(
            documents = prepared.len(),
            trace_id, "applying the returned signatures to the documents"
        );
        for document in prepared {
            let encoded =
                extract_encoded_signature(response, single_document, timestamp, &document.document_id, trace_id)?;
            let signature = BASE64.decode(encoded)?;
            self.preparer
                .finalize(
                    &document.document_id,
                    &signature,
                    document.reserved_size,
                    response.crl_entries(),
                    response.ocsp_entries(),
                    trace_id,
                )
                .await?;
        }
        Ok(())
    }

    /// Releases in reverse order of acquisition. Already-finalized
    /// documents are unaffected, release is idempotent.
    async fn release_documents(&self, prepared: &[PreparedDocument]) {
        for document in prepared.iter().rev() {
            self.preparer.release(&document.document_id).await;
        }
    }
}

/// Maps a terminal response onto a [`SignatureOutcome`].
///
/// Responses whose codes represent a user-level verdict become an outcome;
/// everything else is a protocol error carrying the full result summary.
fn classify_outcome(response: &SignResponseEnvelope, trace_id: &str) -> Result<SignatureOutcome> {
    let Some(major_uri) = response.result_major() else {
        return Err(AisError::Protocol {
            trace_id: trace_id.to_string(),
            summary: "Incomplete response received from the signing service".to_string(),
        });
    };

    let failure = || AisError::Protocol {
        trace_id: trace_id.to_string(),
        summary: format!(
            "Failure response received from the signing service: {}",
            response.result_summary()
        ),
    };

    let Some(major) = ResultMajorCode::from_uri(major_uri) else {
        return Err(failure());
    };

    if major == ResultMajorCode::SUCCESS {
        return Ok(SignatureOutcome::Success);
    }
    if major == ResultMajorCode::PENDING {
        return Ok(SignatureOutcome::UserTimeout);
    }
    if major == ResultMajorCode::REQUESTER_ERROR || major == ResultMajorCode::SUBSYSTEM_ERROR {
        let minor = response.result_minor().and_then(ResultMinorCode::from_uri);
        if let Some(outcome) = outcome_from_minor_code(minor, response, trace_id) {
            return Ok(outcome);
        }
    }
    Err(failure())
}

fn outcome_from_minor_code(
    minor: Option<ResultMinorCode>,
    response: &SignResponseEnvelope,
    trace_id: &str,
) -> Option<SignatureOutcome> {
    let minor = minor?;

    if minor == ResultMinorCode::SERIAL_NUMBER_MISMATCH {
        return Some(SignatureOutcome::SerialNumberMismatch);
    }
    if minor == ResultMinorCode::STEPUP_TIMEOUT {
        return Some(SignatureOutcome::UserTimeout);
    }
    if minor == ResultMinorCode::STEPUP_CANCEL {
        return Some(SignatureOutcome::UserCancel);
    }
    if minor == ResultMinorCode::INSUFFICIENT_DATA
        && response
            .result_message_text()
            .map_or(false, |m| m.contains(MISSING_MSISDN_MESSAGE))
    {
        error!(
            trace_id,
            "The required MSISDN parameter was missing in the request. This can \
             happen in the on-demand flow, depending on the account configuration. \
             The on-demand flow with step-up can be used as an alternative."
        );
        return Some(SignatureOutcome::InsufficientDataWithAbsentMsisdn);
    }
    if minor == ResultMinorCode::SERVICE_ERROR {
        if let Some(message) = response.result_message_text() {
            if let Some(code) = ResultMessageCode::from_uri(message) {
                if code == ResultMessageCode::INVALID_PASSWORD
                    || code == ResultMessageCode::INVALID_OTP
                {
                    return Some(SignatureOutcome::UserAuthenticationFailed);
                }
            }
        }
    }
    None
}

/// Picks the encoded signature for a document out of the response: from the
/// top-level signature object for single submissions, from the batched
/// per-document list otherwise.
fn extract_encoded_signature<'a>(
    response: &'a SignResponseEnvelope,
    single_document: bool,
    timestamp: bool,
    document_id: &str,
    trace_id: &str,
) -> Result<&'a str> {
    let encoded = if single_document {
        response
            .signature_object()
            .and_then(|object| object.encoded_signature(timestamp))
    } else {
        response
            .signature_object_for_document(document_id)
            .and_then(|object| object.encoded_signature(timestamp))
    };
    encoded.ok_or_else(|| AisError::SignatureMissing {
        trace_id: trace_id.to_string(),
        document_id: document_id.to_string(),
    })
}
