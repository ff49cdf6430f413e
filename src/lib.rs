//! AIS Client - Swisscom All-in Signing Service
//!
//! Provides a client for remote signing and timestamping with:
//! - Static, on-demand and on-demand-with-step-up signatures
//! - Trait-based document preparation and REST transport
//! - Bounded polling for asynchronous step-up transactions
//! - Consent URL delivery for mobile user authorisation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               AisClient                 │
//! │   (Main entry point for signatures)     │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ Signature   │       │ Document    │
//! │ Transport   │       │ Preparer    │
//! │ (REST/Mock) │       │             │
//! └─────────────┘       └─────────────┘
//! ```

pub mod client;
pub mod config;
pub mod consent;
pub mod document;
pub mod error;
pub mod model;
pub mod rest;

// Re-export main types for convenience
pub use client::AisClient;
pub use config::{AisClientConfig, RestConfig};
pub use consent::{ChannelConsentObserver, ConsentObserver};
pub use document::{DetachedSignaturePreparer, DocumentPreparer, InMemoryDocumentPreparer};
pub use error::{AisError, Result};
pub use model::intent::{DocumentSource, SigningIntent, StepUp};
pub use model::outcome::SignatureOutcome;
pub use model::types::{
    DigestAlgorithm, RevocationInformation, SignatureMode, SignatureStandard, SignatureType,
};
pub use rest::{MockTransport, RestClient, SignatureTransport};
