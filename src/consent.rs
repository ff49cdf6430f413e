//! Step-up consent propagation.
//!
//! During an on-demand signature with step-up the service hands out a URL
//! the signer has to open and approve. The client cannot do that on the
//! user's behalf; it forwards the URL to a [`ConsentObserver`] and keeps
//! polling.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::rest::model::SignResponseEnvelope;

/// Receiver of step-up consent URLs.
///
/// Implementations must not block: the notifier calls them from the middle
/// of the polling loop.
pub trait ConsentObserver: Send + Sync {
    fn consent_url_received(&self, url: &str, trace_id: &str);
}

/// Per-operation notifier that forwards each distinct consent URL exactly
/// once.
///
/// The service repeats the URL on every pending poll; the observer is only
/// told again when the URL actually changes.
pub struct ConsentNotifier {
    observer: Option<Arc<dyn ConsentObserver>>,
    last_url: Mutex<Option<String>>,
}

impl ConsentNotifier {
    pub fn new(observer: Option<Arc<dyn ConsentObserver>>) -> Self {
        Self {
            observer,
            last_url: Mutex::new(None),
        }
    }

    /// Forwards the consent URL of the response, if there is one and it was
    /// not already delivered.
    pub fn process(&self, response: &SignResponseEnvelope, trace_id: &str) {
        let Some(url) = response.consent_url() else {
            return;
        };
        let mut last_url = self.last_url.lock().unwrap_or_else(|e| e.into_inner());
        if last_url.as_deref() == Some(url) {
            return;
        }
        *last_url = Some(url.to_string());

        match &self.observer {
            Some(observer) => {
                debug!(url, trace_id, "forwarding consent URL");
                observer.consent_url_received(url, trace_id);
            }
            None => {
                warn!(
                    trace_id,
                    "Consent URL was received from the service, but no consent observer \
                     was configured. This transaction will probably fail"
                );
            }
        }
    }
}

/// Observer that pushes consent URLs into an unbounded channel, for callers
/// that want to await them elsewhere.
pub struct ChannelConsentObserver {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelConsentObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ConsentObserver for ChannelConsentObserver {
    fn consent_url_received(&self, url: &str, trace_id: &str) {
        if self.sender.send(url.to_string()).is_err() {
            debug!(trace_id, "consent receiver dropped, discarding URL");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct RecordingObserver {
        urls: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn new() -> Self {
            Self {
                urls: Mutex::new(Vec::new()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    impl ConsentObserver for RecordingObserver {
        fn consent_url_received(&self, url: &str, _trace_id: &str) {
            self.urls.lock().unwrap().push(url.to_string());
        }
    }

    fn response_with_consent(url: &str) -> SignResponseEnvelope {
        serde_json::from_value(json!({
            "SignResponse": {
                "OptionalOutputs": {
                    "sc.StepUpAuthorisationInfo": {
                        "sc.Result": { "sc.ConsentURL": url }
                    }
                }
            }
        }))
        .unwrap()
    }

    fn response_without_consent() -> SignResponseEnvelope {
        serde_json::from_value(json!({ "SignResponse": {} })).unwrap()
    }

    #[test]
    fn repeated_url_is_delivered_once() {
        let observer = Arc::new(RecordingObserver::new());
        let notifier = ConsentNotifier::new(Some(observer.clone()));
        let response = response_with_consent("https://consent.example/1");

        notifier.process(&response, "t");
        notifier.process(&response, "t");
        notifier.process(&response, "t");

        assert_eq!(observer.urls(), ["https://consent.example/1".to_string()]);
    }

    #[test]
    fn changed_url_is_delivered_again() {
        let observer = Arc::new(RecordingObserver::new());
        let notifier = ConsentNotifier::new(Some(observer.clone()));

        notifier.process(&response_with_consent("https://consent.example/1"), "t");
        notifier.process(&response_with_consent("https://consent.example/2"), "t");

        assert_eq!(
            observer.urls(),
            [
                "https://consent.example/1".to_string(),
                "https://consent.example/2".to_string()
            ]
        );
    }

    #[test]
    fn responses_without_url_are_ignored() {
        let observer = Arc::new(RecordingObserver::new());
        let notifier = ConsentNotifier::new(Some(observer.clone()));

        notifier.process(&response_without_consent(), "t");

        assert!(observer.urls().is_empty());
    }

    #[test]
    fn missing_observer_does_not_panic() {
        let notifier = ConsentNotifier::new(None);
        notifier.process(&response_with_consent("https://consent.example/1"), "t");
    }

    #[tokio::test]
    async fn channel_observer_forwards_urls() {
        let (observer, mut receiver) = ChannelConsentObserver::new();
        let notifier = ConsentNotifier::new(Some(Arc::new(observer)));

        notifier.process(&response_with_consent("https://consent.example/1"), "t");

        assert_eq!(
            receiver.recv().await.as_deref(),
            Some("https://consent.example/1")
        );
    }
}
