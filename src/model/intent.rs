//! Caller-facing description of one signing operation.

use std::path::PathBuf;

use uuid::Uuid;

use crate::error::{AisError, Result};
use crate::model::types::{
    DigestAlgorithm, RevocationInformation, SignatureMode, SignatureStandard, SignatureType,
};

/// Reference to one document to be signed: where to read it, where to put
/// the signed output, and how to digest it.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub digest_algorithm: DigestAlgorithm,
}

impl DocumentSource {
    /// New source with the default SHA-512 digest.
    pub fn new(input_file: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            digest_algorithm: DigestAlgorithm::Sha512,
        }
    }

    pub fn with_digest_algorithm(mut self, digest_algorithm: DigestAlgorithm) -> Self {
        self.digest_algorithm = digest_algorithm;
        self
    }

    fn validate(&self, transaction_id: &str) -> Result<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(AisError::Validation(format!(
                "The input file cannot be empty - {transaction_id}"
            )));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(AisError::Validation(format!(
                "The output file cannot be empty - {transaction_id}"
            )));
        }
        Ok(())
    }
}

/// Step-up authorisation parameters: the phone that must confirm the
/// signature, and what the confirmation prompt says.
#[derive(Debug, Clone, Default)]
pub struct StepUp {
    /// Language of the confirmation message (e.g. "en", "de").
    pub language: String,
    /// Mobile number that receives the confirmation.
    pub msisdn: String,
    /// Message displayed to the user on the device.
    pub message: String,
    /// Expected device serial number; the service rejects a mismatch.
    pub serial_number: Option<String>,
}

impl StepUp {
    pub fn new(
        language: impl Into<String>,
        msisdn: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            msisdn: msisdn.into(),
            message: message.into(),
            serial_number: None,
        }
    }

    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }
}

/// One logical signing operation: the documents, the mode, the identity
/// on whose behalf the service signs, and the optional directives.
///
/// Built once by the caller, consumed by [`AisClient::sign`], never
/// mutated afterwards.
///
/// [`AisClient::sign`]: crate::client::AisClient::sign
#[derive(Debug, Clone)]
pub struct SigningIntent {
    pub mode: SignatureMode,
    pub documents: Vec<DocumentSource>,
    /// Claimed identity name, as provisioned by the service operator.
    pub claimed_identity_name: String,
    /// Optional claimed identity key, appended to the name on the wire
    /// for content signatures.
    pub claimed_identity_key: Option<String>,
    /// Subject distinguished name for on-demand certificate issuance.
    pub distinguished_name: Option<String>,
    pub step_up: Option<StepUp>,
    pub signature_standard: SignatureStandard,
    /// Revocation-information override; absent means the mode default.
    pub revocation_information: Option<RevocationInformation>,
    /// Request an RFC 3161 timestamp on top of a content signature.
    pub add_timestamp: bool,
    /// Correlates every log line, request, and error of this operation.
    pub transaction_id: String,
}

impl SigningIntent {
    fn new(mode: SignatureMode, documents: Vec<DocumentSource>, identity: String) -> Self {
        Self {
            mode,
            documents,
            claimed_identity_name: identity,
            claimed_identity_key: None,
            distinguished_name: None,
            step_up: None,
            signature_standard: SignatureStandard::Default,
            revocation_information: None,
            add_timestamp: false,
            transaction_id: Uuid::new_v4().to_string(),
        }
    }

    /// Signature with the static certificate of the claimed identity.
    pub fn static_signature(
        documents: Vec<DocumentSource>,
        claimed_identity_name: impl Into<String>,
    ) -> Self {
        Self::new(SignatureMode::Static, documents, claimed_identity_name.into())
    }

    /// Signature with a certificate issued on demand for the given subject.
    pub fn on_demand(
        documents: Vec<DocumentSource>,
        claimed_identity_name: impl Into<String>,
        distinguished_name: impl Into<String>,
    ) -> Self {
        let mut intent = Self::new(
            SignatureMode::OnDemand,
            documents,
            claimed_identity_name.into(),
        );
        intent.distinguished_name = Some(distinguished_name.into());
        intent
    }

    /// On-demand signature gated by a step-up confirmation on the user's
    /// phone.
    pub fn on_demand_with_step_up(
        documents: Vec<DocumentSource>,
        claimed_identity_name: impl Into<String>,
        distinguished_name: impl Into<String>,
        step_up: StepUp,
    ) -> Self {
        let mut intent = Self::new(
            SignatureMode::OnDemandStepUp,
            documents,
            claimed_identity_name.into(),
        );
        intent.distinguished_name = Some(distinguished_name.into());
        intent.step_up = Some(step_up);
        intent
    }

    /// Trusted timestamp only.
    pub fn timestamp(
        documents: Vec<DocumentSource>,
        claimed_identity_name: impl Into<String>,
    ) -> Self {
        Self::new(
            SignatureMode::Timestamp,
            documents,
            claimed_identity_name.into(),
        )
    }

    pub fn with_claimed_identity_key(mut self, key: impl Into<String>) -> Self {
        self.claimed_identity_key = Some(key.into());
        self
    }

    pub fn with_signature_standard(mut self, standard: SignatureStandard) -> Self {
        self.signature_standard = standard;
        self
    }

    pub fn with_revocation_information(mut self, revocation: RevocationInformation) -> Self {
        self.revocation_information = Some(revocation);
        self
    }

    pub fn with_add_timestamp(mut self, add_timestamp: bool) -> Self {
        self.add_timestamp = add_timestamp;
        self
    }

    pub fn signature_type(&self) -> SignatureType {
        self.mode.signature_type()
    }

    pub fn with_step_up(&self) -> bool {
        self.mode.with_step_up()
    }

    pub fn with_certificate_request(&self) -> bool {
        self.mode.with_certificate_request()
    }

    /// Check the intent before any document is touched or any request is
    /// sent. Requirements depend on the mode.
    pub fn validate(&self) -> Result<()> {
        let tid = &self.transaction_id;
        if self.documents.is_empty() {
            return Err(AisError::Validation(format!(
                "At least one document must be provided for signing - {tid}"
            )));
        }
        for document in &self.documents {
            document.validate(tid)?;
        }
        if self.claimed_identity_name.trim().is_empty() {
            return Err(AisError::Validation(format!(
                "The claimed identity name cannot be empty - {tid}"
            )));
        }
        if self.with_certificate_request()
            && self
                .distinguished_name
                .as_deref()
                .map_or(true, |dn| dn.trim().is_empty())
        {
            return Err(AisError::Validation(format!(
                "The distinguished name is required for {} signing - {tid}",
                self.mode
            )));
        }
        if self.with_step_up() {
            let step_up = self.step_up.as_ref().ok_or_else(|| {
                AisError::Validation(format!(
                    "The step-up parameters are required for {} signing - {tid}",
                    self.mode
                ))
            })?;
            if step_up.language.trim().is_empty() {
                return Err(AisError::Validation(format!(
                    "The step-up language cannot be empty - {tid}"
                )));
            }
            if step_up.msisdn.trim().is_empty() {
                return Err(AisError::Validation(format!(
                    "The step-up MSISDN cannot be empty - {tid}"
                )));
            }
            if step_up.message.trim().is_empty() {
                return Err(AisError::Validation(format!(
                    "The step-up message cannot be empty - {tid}"
                )));
            }
        }
        Ok(())
    }
}
