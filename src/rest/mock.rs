//! Scripted transport for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AisError, Result};
use crate::rest::client::SignatureTransport;
use crate::rest::model::{PendingRequestEnvelope, SignRequestEnvelope, SignResponseEnvelope};

/// Transport double that replays scripted answers.
///
/// Answers are consumed front to back across both endpoints: the first one
/// serves the signing submission, the following ones serve the polls. Every
/// request that passes through is recorded for inspection.
#[derive(Default)]
pub struct MockTransport {
    answers: Mutex<VecDeque<Result<SignResponseEnvelope>>>,
    sign_requests: Mutex<Vec<SignRequestEnvelope>>,
    pending_requests: Mutex<Vec<PendingRequestEnvelope>>,
    sign_count: AtomicU32,
    poll_count: AtomicU32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn with_response(self, response: SignResponseEnvelope) -> Self {
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(response));
        self
    }

    /// Queue several responses in order.
    pub fn with_responses(self, responses: impl IntoIterator<Item = SignResponseEnvelope>) -> Self {
        {
            let mut answers = self.answers.lock().unwrap_or_else(|e| e.into_inner());
            answers.extend(responses.into_iter().map(Ok));
        }
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: AisError) -> Self {
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
        self
    }

    /// Number of signing submissions seen.
    pub fn sign_count(&self) -> u32 {
        self.sign_count.load(Ordering::SeqCst)
    }

    /// Number of status polls seen.
    pub fn poll_count(&self) -> u32 {
        self.poll_count.load(Ordering::SeqCst)
    }

    /// Recorded signing submissions in order.
    pub fn sign_requests(&self) -> Vec<SignRequestEnvelope> {
        self.sign_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Recorded status polls in order.
    pub fn pending_requests(&self) -> Vec<PendingRequestEnvelope> {
        self.pending_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_answer(&self, trace_id: &str) -> Result<SignResponseEnvelope> {
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(AisError::Protocol {
                    trace_id: trace_id.to_string(),
                    summary: "No scripted response left".to_string(),
                })
            })
    }
}

#[async_trait]
impl SignatureTransport for MockTransport {
    async fn request_signature(
        &self,
        request: &SignRequestEnvelope,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope> {
        self.sign_count.fetch_add(1, Ordering::SeqCst);
        self.sign_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.next_answer(trace_id)
    }

    async fn poll_signature_status(
        &self,
        request: &PendingRequestEnvelope,
        trace_id: &str,
    ) -> Result<SignResponseEnvelope> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.pending_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.next_answer(trace_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentSource, SigningIntent};
    use crate::rest::builder;
    use serde_json::json;

    fn success_response() -> SignResponseEnvelope {
        serde_json::from_value(json!({
            "SignResponse": {
                "Result": { "ResultMajor": "urn:oasis:names:tc:dss:1.0:resultmajor:Success" }
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn answers_are_consumed_in_order() {
        let transport = MockTransport::new()
            .with_response(success_response())
            .with_error(AisError::UnexpectedStatus {
                trace_id: "t".into(),
                status: 503,
                body: String::new(),
            });

        let intent = SigningIntent::static_signature(
            vec![DocumentSource::new("in.pdf", "out.sig")],
            "alice",
        );
        let sign = builder::build_sign_request(&intent, &[]);
        let pending = builder::build_pending_request("resp-1", &intent);

        assert!(transport.request_signature(&sign, "t").await.is_ok());
        assert!(transport.poll_signature_status(&pending, "t").await.is_err());
        assert_eq!(transport.sign_count(), 1);
        assert_eq!(transport.poll_count(), 1);
        assert_eq!(transport.sign_requests().len(), 1);
        assert_eq!(transport.pending_requests().len(), 1);
    }

    #[tokio::test]
    async fn exhausted_script_is_an_error() {
        let transport = MockTransport::new();
        let intent = SigningIntent::static_signature(
            vec![DocumentSource::new("in.pdf", "out.sig")],
            "alice",
        );
        let sign = builder::build_sign_request(&intent, &[]);

        let err = transport.request_signature(&sign, "t").await.unwrap_err();
        assert!(matches!(err, AisError::Protocol { .. }));
    }
}
