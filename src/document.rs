//! Document preparation and signature reconciliation.
//!
//! The client never parses document formats itself. A [`DocumentPreparer`]
//! turns each [`DocumentSource`] into a digest to submit, and later receives
//! the signature blob the service produced for it. [`DetachedSignaturePreparer`]
//! hashes whole files and writes detached signature files;
//! [`InMemoryDocumentPreparer`] keeps everything in memory for tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AisError, Result};
use crate::model::{DigestAlgorithm, DocumentSource, SignatureType};

/// Digest of one document, ready to submit.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    /// Correlation id echoed back by batched responses.
    pub document_id: String,
    pub digest_algorithm: DigestAlgorithm,
    /// Base64 of the raw digest bytes.
    pub digest_base64: String,
    /// Upper bound for the signature that will come back. Finalization
    /// rejects anything larger without writing.
    pub reserved_size: usize,
}

/// Hashes documents before submission and reconciles returned signatures
/// afterwards.
///
/// A successfully prepared document may hold resources until its signature
/// arrives. Every prepared document must be released exactly once, either
/// through [`finalize`](DocumentPreparer::finalize) on success or through
/// [`release`](DocumentPreparer::release) on any other path.
#[async_trait]
pub trait DocumentPreparer: Send + Sync {
    /// Hashes the document and reserves whatever state finalization needs.
    async fn prepare(
        &self,
        source: &DocumentSource,
        signature_type: SignatureType,
        trace_id: &str,
    ) -> Result<PreparedDocument>;

    /// Applies the decoded signature to a prepared document and releases it.
    /// Fails before touching the output when the signature exceeds
    /// `reserved_size`. Revocation material accompanies the signature when
    /// the service returned any.
    async fn finalize(
        &self,
        document_id: &str,
        signature: &[u8],
        reserved_size: usize,
        crl_entries: &[String],
        ocsp_entries: &[String],
        trace_id: &str,
    ) -> Result<()>;

    /// Drops the state of a prepared document without applying a signature.
    /// Safe to call for ids that were already finalized or released.
    async fn release(&self, document_id: &str);
}

/// Preparer that digests whole input files and writes each returned
/// signature to the configured output path as a detached blob.
///
/// The reserved size reported by [`prepare`](DocumentPreparer::prepare) is
/// an upper bound taken from the signature type.
#[derive(Debug, Default)]
pub struct DetachedSignaturePreparer {
    in_flight: DashMap<String, PathBuf>,
}

impl DetachedSignaturePreparer {
    pub fn new() -> Self {
        Self {
            in_flight: DashMap::new(),
        }
    }
}

#[async_trait]
impl DocumentPreparer for DetachedSignaturePreparer {
    async fn prepare(
        &self,
        source: &DocumentSource,
        signature_type: SignatureType,
        trace_id: &str,
    ) -> Result<PreparedDocument> {
        let content = tokio::fs::read(&source.input_file)
            .await
            .map_err(|e| AisError::DocumentIo {
                path: source.input_file.display().to_string(),
                source: e,
            })?;
        let digest = source.digest_algorithm.digest(&content);
        let document_id = format!("DOC-{}", Uuid::new_v4());
        debug!(
            document_id = %document_id,
            input_file = %source.input_file.display(),
            algorithm = source.digest_algorithm.algorithm_name(),
            content_bytes = content.len(),
            trace_id,
            "prepared document digest"
        );
        self.in_flight
            .insert(document_id.clone(), source.output_file.clone());
        Ok(PreparedDocument {
            document_id,
            digest_algorithm: source.digest_algorithm,
            digest_base64: BASE64.encode(digest),
            reserved_size: signature_type.estimated_signature_size(),
        })
    }

    async fn finalize(
        &self,
        document_id: &str,
        signature: &[u8],
        reserved_size: usize,
        crl_entries: &[String],
        ocsp_entries: &[String],
        trace_id: &str,
    ) -> Result<()> {
        let (_, output_file) = self
            .in_flight
            .remove(document_id)
            .ok_or_else(|| AisError::UnknownDocument(document_id.to_string()))?;
        if signature.len() > reserved_size {
            return Err(AisError::SignatureTooLarge {
                document_id: document_id.to_string(),
                actual: signature.len(),
                reserved: reserved_size,
            });
        }
        tokio::fs::write(&output_file, signature)
            .await
            .map_err(|e| AisError::DocumentIo {
                path: output_file.display().to_string(),
                source: e,
            })?;
        if !crl_entries.is_empty() || !ocsp_entries.is_empty() {
            // Detached outputs have no container to embed revocation data
            // into; surface it for the consuming application instead.
            info!(
                document_id = %document_id,
                crls = crl_entries.len(),
                ocsps = ocsp_entries.len(),
                trace_id,
                "revocation information received alongside the signature"
            );
        }
        info!(
            document_id = %document_id,
            output_file = %output_file.display(),
            signature_bytes = signature.len(),
            trace_id,
            "wrote detached signature"
        );
        Ok(())
    }

    async fn release(&self, document_id: &str) {
        if self.in_flight.remove(document_id).is_some() {
            debug!(document_id = %document_id, "released document without a signature");
        }
    }
}

/// Finalize call recorded by [`InMemoryDocumentPreparer`].
#[derive(Debug, Clone)]
pub struct FinalizedDocument {
    pub document_id: String,
    pub signature: Vec<u8>,
    pub crl_entries: Vec<String>,
    pub ocsp_entries: Vec<String>,
}

/// In-memory preparer for tests.
///
/// Digests registered content instead of touching the filesystem, assigns
/// sequential document ids (`DOC-1`, `DOC-2`, ...) so tests can script
/// batched responses, and records every finalize and release call.
#[derive(Debug, Default)]
pub struct InMemoryDocumentPreparer {
    contents: DashMap<PathBuf, Vec<u8>>,
    fail_for: DashMap<PathBuf, ()>,
    reserved_size: Option<usize>,
    prepare_calls: AtomicU32,
    finalized: Mutex<Vec<FinalizedDocument>>,
    released: Mutex<Vec<String>>,
}

impl InMemoryDocumentPreparer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bytes to digest for an input path. Unregistered paths
    /// digest the path string itself.
    pub fn with_content(self, input_file: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.contents.insert(input_file.into(), content.into());
        self
    }

    /// Make preparation fail for an input path.
    pub fn with_failure_for(self, input_file: impl Into<PathBuf>) -> Self {
        self.fail_for.insert(input_file.into(), ());
        self
    }

    /// Override the reserved size reported by prepare. Defaults to the
    /// signature type's estimate.
    pub fn with_reserved_size(mut self, reserved_size: usize) -> Self {
        self.reserved_size = Some(reserved_size);
        self
    }

    /// Number of prepare calls seen so far.
    pub fn prepare_count(&self) -> u32 {
        self.prepare_calls.load(Ordering::SeqCst)
    }

    /// Finalize calls in the order they happened.
    pub fn finalized(&self) -> Vec<FinalizedDocument> {
        self.finalized
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Released document ids in the order they happened.
    pub fn released(&self) -> Vec<String> {
        self.released
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl DocumentPreparer for InMemoryDocumentPreparer {
    async fn prepare(
        &self,
        source: &DocumentSource,
        signature_type: SignatureType,
        _trace_id: &str,
    ) -> Result<PreparedDocument> {
        let sequence = self.prepare_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_for.contains_key(&source.input_file) {
            return Err(AisError::DocumentIo {
                path: source.input_file.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted failure"),
            });
        }
        let digest = match self.contents.get(&source.input_file) {
            Some(content) => source.digest_algorithm.digest(&content),
            None => source
                .digest_algorithm
                .digest(source.input_file.display().to_string().as_bytes()),
        };
        Ok(PreparedDocument {
            document_id: format!("DOC-{sequence}"),
            digest_algorithm: source.digest_algorithm,
            digest_base64: BASE64.encode(digest),
            reserved_size: self
                .reserved_size
                .unwrap_or_else(|| signature_type.estimated_signature_size()),
        })
    }

    async fn finalize(
        &self,
        document_id: &str,
        signature: &[u8],
        reserved_size: usize,
        crl_entries: &[String],
        ocsp_entries: &[String],
        _trace_id: &str,
    ) -> Result<()> {
        if signature.len() > reserved_size {
            return Err(AisError::SignatureTooLarge {
                document_id: document_id.to_string(),
                actual: signature.len(),
                reserved: reserved_size,
            });
        }
        self.finalized
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(FinalizedDocument {
                document_id: document_id.to_string(),
                signature: signature.to_vec(),
                crl_entries: crl_entries.to_vec(),
                ocsp_entries: ocsp_entries.to_vec(),
            });
        Ok(())
    }

    async fn release(&self, document_id: &str) {
        self.released
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(document_id.to_string());
    }
}
