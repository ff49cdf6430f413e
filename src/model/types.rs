//! Value catalogs used across the signing protocol: signature modes and
//! types, digest algorithms, signature standards, revocation-information
//! directives, and the additional processing profiles.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::AisError;

/// How the signature is produced on the service side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMode {
    /// Signature with a long-lived certificate held by the service.
    Static,
    /// Signature with a certificate issued on the fly for the request.
    OnDemand,
    /// On-demand certificate gated by an out-of-band user confirmation.
    OnDemandStepUp,
    /// Trusted timestamp only, no content signature.
    Timestamp,
}

impl SignatureMode {
    /// Human-readable name used in log and error messages.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            SignatureMode::Static => "Static",
            SignatureMode::OnDemand => "On demand",
            SignatureMode::OnDemandStepUp => "On demand step up",
            SignatureMode::Timestamp => "Timestamp",
        }
    }

    /// The signature type requested from the service for this mode.
    pub fn signature_type(&self) -> SignatureType {
        match self {
            SignatureMode::Timestamp => SignatureType::Timestamp,
            _ => SignatureType::Cms,
        }
    }

    /// Whether the request must carry a certificate-request block.
    pub fn with_certificate_request(&self) -> bool {
        matches!(self, SignatureMode::OnDemand | SignatureMode::OnDemandStepUp)
    }

    /// Whether the flow runs the step-up authorisation sub-protocol.
    pub fn with_step_up(&self) -> bool {
        matches!(self, SignatureMode::OnDemandStepUp)
    }

    /// Mode-specific additional profiles, before batch derivation.
    pub fn additional_profiles(&self) -> &'static [AdditionalProfile] {
        match self {
            SignatureMode::Static => &[],
            SignatureMode::OnDemand => &[AdditionalProfile::OnDemandCertificate],
            SignatureMode::OnDemandStepUp => &[
                AdditionalProfile::OnDemandCertificate,
                AdditionalProfile::Redirect,
                AdditionalProfile::Async,
            ],
            SignatureMode::Timestamp => &[AdditionalProfile::Timestamp],
        }
    }
}

impl fmt::Display for SignatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

impl FromStr for SignatureMode {
    type Err = AisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace([' ', '-', '_'], "").as_str() {
            "static" => Ok(SignatureMode::Static),
            "ondemand" => Ok(SignatureMode::OnDemand),
            "ondemandstepup" => Ok(SignatureMode::OnDemandStepUp),
            "timestamp" => Ok(SignatureMode::Timestamp),
            _ => Err(AisError::Validation(format!(
                "Invalid signature mode: {s}"
            ))),
        }
    }
}

/// Requested signature payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureType {
    /// CMS signature (RFC 3369).
    Cms,
    /// RFC 3161 timestamp token.
    Timestamp,
}

impl SignatureType {
    /// URI of the signature type, as used on the wire.
    pub fn uri(&self) -> &'static str {
        match self {
            SignatureType::Cms => "urn:ietf:rfc:3369",
            SignatureType::Timestamp => "urn:ietf:rfc:3161",
        }
    }

    /// Estimated final size of the signature in bytes; documents reserve
    /// this much placeholder space before the request goes out.
    pub fn estimated_signature_size(&self) -> usize {
        match self {
            SignatureType::Cms => 30_000,
            SignatureType::Timestamp => 15_000,
        }
    }
}

/// Digest algorithm used for the document hashes submitted for signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Name of the algorithm.
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// URI of the algorithm, as used on the wire.
    pub fn uri(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
            DigestAlgorithm::Sha384 => "http://www.w3.org/2001/04/xmldsig-more#sha384",
            DigestAlgorithm::Sha512 => "http://www.w3.org/2001/04/xmlenc#sha512",
        }
    }

    /// Digest `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.algorithm_name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = AisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(AisError::Validation(format!(
                "Invalid digest algorithm: {s}"
            ))),
        }
    }
}

/// Signature standard directive, sent only for content signatures and only
/// when the caller overrides the service default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureStandard {
    /// Let the service pick (CAdES unless configured otherwise).
    #[default]
    Default,
    Cades,
    Pades,
    PadesBaseline,
    Plain,
}

impl SignatureStandard {
    /// Wire value; empty for the service default.
    pub fn value(&self) -> &'static str {
        match self {
            SignatureStandard::Default => "",
            SignatureStandard::Cades => "CAdES",
            SignatureStandard::Pades => "PAdES",
            SignatureStandard::PadesBaseline => "PAdES-baseline",
            SignatureStandard::Plain => "PLAIN",
        }
    }
}

impl FromStr for SignatureStandard {
    type Err = AisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "" | "DEFAULT" => Ok(SignatureStandard::Default),
            "CADES" => Ok(SignatureStandard::Cades),
            "PADES" => Ok(SignatureStandard::Pades),
            "PADES-BASELINE" => Ok(SignatureStandard::PadesBaseline),
            "PLAIN" => Ok(SignatureStandard::Plain),
            _ => Err(AisError::Validation(format!(
                "Invalid signature standard value: {s}"
            ))),
        }
    }
}

/// Revocation-information flavour embedded with the signature. Absence
/// means the service default, which follows the signature standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationInformation {
    /// Embedded in CMS as an unsigned CAdES attribute.
    Cades,
    /// Embedded in the signature as a signed archival attribute.
    Pdf,
    /// Deprecated alias for [`RevocationInformation::Pdf`].
    Pades,
    /// Returned as optional output for the client to place into the
    /// document's validation store.
    PadesBaseline,
    /// Both CAdES and PDF flavours.
    Both,
    /// Returned as optional output, unprocessed.
    Plain,
}

impl RevocationInformation {
    /// Wire value of the directive.
    pub fn value(&self) -> &'static str {
        match self {
            RevocationInformation::Cades => "CAdES",
            RevocationInformation::Pdf => "PDF",
            RevocationInformation::Pades => "PAdES",
            RevocationInformation::PadesBaseline => "PAdES-baseline",
            RevocationInformation::Both => "BOTH",
            RevocationInformation::Plain => "PLAIN",
        }
    }
}

impl FromStr for RevocationInformation {
    type Err = AisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CADES" => Ok(RevocationInformation::Cades),
            "PDF" => Ok(RevocationInformation::Pdf),
            "PADES" => Ok(RevocationInformation::Pades),
            "PADES-BASELINE" => Ok(RevocationInformation::PadesBaseline),
            "BOTH" => Ok(RevocationInformation::Both),
            "PLAIN" => Ok(RevocationInformation::Plain),
            _ => Err(AisError::Validation(format!(
                "Invalid revocation information value: {s}"
            ))),
        }
    }
}

/// Additional processing profiles announced in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalProfile {
    /// The request may be answered with a Pending result carrying a
    /// response id; the client then polls with a pending request.
    Async,
    /// Required when a single request carries multiple document digests;
    /// response objects are then correlated by document id.
    Batch,
    /// The signing certificate is issued on demand for this request.
    OnDemandCertificate,
    /// Step-up authorisation: the service returns a consent URL the user
    /// must visit before the signature completes.
    Redirect,
    /// The response contains only a timestamp of the document hash.
    Timestamp,
    /// Static plain PKCS#1 signature.
    PlainSignature,
}

impl AdditionalProfile {
    /// URI of the profile, as used on the wire.
    pub fn uri(&self) -> &'static str {
        match self {
            AdditionalProfile::Async => {
                "urn:oasis:names:tc:dss:1.0:profiles:asynchronousprocessing"
            }
            AdditionalProfile::Batch => "http://ais.swisscom.ch/1.0/profiles/batchprocessing",
            AdditionalProfile::OnDemandCertificate => {
                "http://ais.swisscom.ch/1.0/profiles/ondemandcertificate"
            }
            AdditionalProfile::Redirect => "http://ais.swisscom.ch/1.1/profiles/redirect",
            AdditionalProfile::Timestamp => "urn:oasis:names:tc:dss:1.0:profiles:timestamping",
            AdditionalProfile::PlainSignature => {
                "http://ais.swisscom.ch/1.1/profiles/plainsignature"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_profiles_match_the_protocol() {
        assert!(SignatureMode::Static.additional_profiles().is_empty());
        assert_eq!(
            SignatureMode::OnDemand.additional_profiles(),
            &[AdditionalProfile::OnDemandCertificate]
        );
        assert_eq!(
            SignatureMode::OnDemandStepUp.additional_profiles(),
            &[
                AdditionalProfile::OnDemandCertificate,
                AdditionalProfile::Redirect,
                AdditionalProfile::Async,
            ]
        );
        assert_eq!(
            SignatureMode::Timestamp.additional_profiles(),
            &[AdditionalProfile::Timestamp]
        );
    }

    #[test]
    fn timestamp_mode_uses_timestamp_signature_type() {
        assert_eq!(
            SignatureMode::Timestamp.signature_type(),
            SignatureType::Timestamp
        );
        assert_eq!(SignatureMode::Static.signature_type(), SignatureType::Cms);
        assert_eq!(
            SignatureMode::OnDemandStepUp.signature_type(),
            SignatureType::Cms
        );
    }

    #[test]
    fn step_up_flags_derive_from_mode() {
        assert!(!SignatureMode::Static.with_step_up());
        assert!(!SignatureMode::Static.with_certificate_request());
        assert!(!SignatureMode::OnDemand.with_step_up());
        assert!(SignatureMode::OnDemand.with_certificate_request());
        assert!(SignatureMode::OnDemandStepUp.with_step_up());
        assert!(SignatureMode::OnDemandStepUp.with_certificate_request());
        assert!(!SignatureMode::Timestamp.with_step_up());
    }

    #[test]
    fn digest_algorithm_parses_common_spellings() {
        assert_eq!(
            "sha-256".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha256
        );
        assert_eq!(
            "SHA512".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha512
        );
        assert!("md5".parse::<DigestAlgorithm>().is_err());
    }

    #[test]
    fn digest_produces_expected_lengths() {
        assert_eq!(DigestAlgorithm::Sha256.digest(b"abc").len(), 32);
        assert_eq!(DigestAlgorithm::Sha384.digest(b"abc").len(), 48);
        assert_eq!(DigestAlgorithm::Sha512.digest(b"abc").len(), 64);
    }

    #[test]
    fn mode_parses_friendly_spellings() {
        assert_eq!(
            "on demand step up".parse::<SignatureMode>().unwrap(),
            SignatureMode::OnDemandStepUp
        );
        assert_eq!(
            "on-demand".parse::<SignatureMode>().unwrap(),
            SignatureMode::OnDemand
        );
        assert!("etsi".parse::<SignatureMode>().is_err());
    }
}
