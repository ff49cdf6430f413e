//! Wire-level request and response types.
//!
//! Field names follow the service's JSON dialect: attributes are prefixed
//! with `@`, vendor extensions with `sc.`, XML-DSIG imports with `dsig.`,
//! async-profile fields with `async.`, and element text lives under `$`.
//! Optional members are skipped entirely when absent.

use serde::{Deserialize, Serialize};

use crate::rest::codes::ResultMajorCode;

// ============================================================================
// Sign request
// ============================================================================

/// Envelope of the initial signing submission.
#[derive(Debug, Clone, Serialize)]
pub struct SignRequestEnvelope {
    #[serde(rename = "SignRequest")]
    pub sign_request: SignRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignRequest {
    #[serde(rename = "@RequestID")]
    pub request_id: String,
    #[serde(rename = "@Profile")]
    pub profile: String,
    #[serde(rename = "InputDocuments")]
    pub input_documents: InputDocuments,
    #[serde(rename = "OptionalInputs")]
    pub optional_inputs: OptionalInputs,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputDocuments {
    #[serde(rename = "DocumentHash")]
    pub document_hash: Vec<DocumentHash>,
}

/// One digest entry: the document is identified by `id` in batched
/// responses.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHash {
    #[serde(rename = "@ID")]
    pub id: String,
    #[serde(rename = "dsig.DigestMethod")]
    pub digest_method: DigestMethod,
    #[serde(rename = "dsig.DigestValue")]
    pub digest_value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DigestMethod {
    #[serde(rename = "@Algorithm")]
    pub algorithm: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionalInputs {
    #[serde(rename = "AddTimestamp", skip_serializing_if = "Option::is_none")]
    pub add_timestamp: Option<AddTimestamp>,
    #[serde(rename = "AdditionalProfile", skip_serializing_if = "Vec::is_empty")]
    pub additional_profile: Vec<String>,
    #[serde(rename = "ClaimedIdentity")]
    pub claimed_identity: ClaimedIdentity,
    #[serde(rename = "SignatureType")]
    pub signature_type: String,
    #[serde(
        rename = "sc.AddRevocationInformation",
        skip_serializing_if = "Option::is_none"
    )]
    pub add_revocation_information: Option<AddRevocationInformation>,
    #[serde(rename = "sc.SignatureStandard", skip_serializing_if = "Option::is_none")]
    pub signature_standard: Option<String>,
    #[serde(rename = "sc.CertificateRequest", skip_serializing_if = "Option::is_none")]
    pub certificate_request: Option<CertificateRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTimestamp {
    #[serde(rename = "@Type")]
    pub timestamp_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimedIdentity {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddRevocationInformation {
    #[serde(rename = "@Type")]
    pub revocation_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateRequest {
    #[serde(rename = "sc.DistinguishedName", skip_serializing_if = "Option::is_none")]
    pub distinguished_name: Option<String>,
    #[serde(
        rename = "sc.StepUpAuthorisation",
        skip_serializing_if = "Option::is_none"
    )]
    pub step_up_authorisation: Option<StepUpAuthorisation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepUpAuthorisation {
    #[serde(rename = "sc.Phone")]
    pub phone: Phone,
}

#[derive(Debug, Clone, Serialize)]
pub struct Phone {
    #[serde(rename = "sc.Language")]
    pub language: String,
    #[serde(rename = "sc.MSISDN")]
    pub msisdn: String,
    #[serde(rename = "sc.Message")]
    pub message: String,
    #[serde(rename = "sc.SerialNumber", skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

// ============================================================================
// Pending (poll) request
// ============================================================================

/// Envelope of a status-poll submission.
#[derive(Debug, Clone, Serialize)]
pub struct PendingRequestEnvelope {
    #[serde(rename = "async.PendingRequest")]
    pub pending_request: PendingRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingRequest {
    #[serde(rename = "@Profile")]
    pub profile: String,
    #[serde(rename = "OptionalInputs")]
    pub optional_inputs: PendingOptionalInputs,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingOptionalInputs {
    #[serde(rename = "ClaimedIdentity")]
    pub claimed_identity: ClaimedIdentity,
    #[serde(rename = "async.ResponseID")]
    pub async_response_id: String,
}

// ============================================================================
// Response
// ============================================================================

/// Envelope of every service answer, for both sign and pending requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignResponseEnvelope {
    #[serde(rename = "SignResponse")]
    pub sign_response: SignResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignResponse {
    #[serde(rename = "@Profile", skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(rename = "Result", skip_serializing_if = "Option::is_none")]
    pub result: Option<ResponseResult>,
    #[serde(rename = "OptionalOutputs", skip_serializing_if = "Option::is_none")]
    pub optional_outputs: Option<OptionalOutputs>,
    #[serde(rename = "SignatureObject", skip_serializing_if = "Option::is_none")]
    pub signature_object: Option<SignatureObject>,
}

/// Three-tier result code of a round trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseResult {
    #[serde(rename = "ResultMajor", skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(rename = "ResultMinor", skip_serializing_if = "Option::is_none")]
    pub minor: Option<String>,
    #[serde(rename = "ResultMessage", skip_serializing_if = "Option::is_none")]
    pub message: Option<TextNode>,
}

/// Element text with an optional language attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextNode {
    #[serde(rename = "@xml.lang", skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(rename = "$")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionalOutputs {
    #[serde(rename = "async.ResponseID", skip_serializing_if = "Option::is_none")]
    pub async_response_id: Option<String>,
    #[serde(rename = "sc.APTransID", skip_serializing_if = "Option::is_none")]
    pub ap_trans_id: Option<String>,
    #[serde(
        rename = "sc.StepUpAuthorisationInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub step_up_authorisation_info: Option<StepUpAuthorisationInfo>,
    #[serde(
        rename = "sc.RevocationInformation",
        skip_serializing_if = "Option::is_none"
    )]
    pub revocation_information: Option<RevocationInformationOutput>,
    #[serde(rename = "sc.MobileIDFault", skip_serializing_if = "Option::is_none")]
    pub mobile_id_fault: Option<MobileIdFault>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepUpAuthorisationInfo {
    #[serde(rename = "sc.Result", skip_serializing_if = "Option::is_none")]
    pub result: Option<StepUpResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepUpResult {
    #[serde(rename = "sc.ConsentURL", skip_serializing_if = "Option::is_none")]
    pub consent_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevocationInformationOutput {
    #[serde(rename = "sc.CRLs", skip_serializing_if = "Option::is_none")]
    pub crls: Option<CrlList>,
    #[serde(rename = "sc.OCSPs", skip_serializing_if = "Option::is_none")]
    pub ocsps: Option<OcspList>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrlList {
    #[serde(rename = "sc.CRL", default)]
    pub crl: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcspList {
    #[serde(rename = "sc.OCSP", default)]
    pub ocsp: Vec<String>,
}

/// Fault details of the mobile-id subsystem, reported alongside step-up
/// error minor codes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobileIdFault {
    #[serde(rename = "sc.Subcode", skip_serializing_if = "Option::is_none")]
    pub subcode: Option<String>,
    #[serde(rename = "sc.Reason", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "sc.Detail", skip_serializing_if = "Option::is_none")]
    pub detail: Option<TextNode>,
}

/// Signature payload of a successful response. A single-document response
/// carries `base64_signature` or `timestamp` directly; a batched response
/// nests per-document objects under `other`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureObject {
    #[serde(rename = "Base64Signature", skip_serializing_if = "Option::is_none")]
    pub base64_signature: Option<Base64Signature>,
    #[serde(rename = "Timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampToken>,
    #[serde(rename = "Other", skip_serializing_if = "Option::is_none")]
    pub other: Option<OtherSignatureOutputs>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Base64Signature {
    #[serde(rename = "@Type", skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
    #[serde(rename = "$")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimestampToken {
    #[serde(rename = "RFC3161TimeStampToken")]
    pub rfc3161_timestamp_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSignatureOutputs {
    #[serde(rename = "sc.SignatureObjects", skip_serializing_if = "Option::is_none")]
    pub signature_objects: Option<SignatureObjects>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureObjects {
    #[serde(rename = "sc.ExtendedSignatureObject", default)]
    pub extended_signature_object: Vec<ExtendedSignatureObject>,
}

/// Per-document signature in a batched response, correlated back to the
/// request by the document id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtendedSignatureObject {
    #[serde(rename = "@WhichDocument", skip_serializing_if = "Option::is_none")]
    pub which_document: Option<String>,
    #[serde(rename = "Base64Signature", skip_serializing_if = "Option::is_none")]
    pub base64_signature: Option<Base64Signature>,
    #[serde(rename = "Timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampToken>,
}

impl ExtendedSignatureObject {
    /// Encoded signature of this entry: the timestamp token for timestamp
    /// responses, the base64 CMS signature otherwise.
    pub fn encoded_signature(&self, timestamp: bool) -> Option<&str> {
        if timestamp {
            self.timestamp
                .as_ref()
                .map(|t| t.rfc3161_timestamp_token.as_str())
        } else {
            self.base64_signature.as_ref().map(|s| s.value.as_str())
        }
    }
}

impl SignatureObject {
    /// Encoded signature of a single-document response.
    pub fn encoded_signature(&self, timestamp: bool) -> Option<&str> {
        if timestamp {
            self.timestamp
                .as_ref()
                .map(|t| t.rfc3161_timestamp_token.as_str())
        } else {
            self.base64_signature.as_ref().map(|s| s.value.as_str())
        }
    }
}

impl SignResponseEnvelope {
    pub fn result_major(&self) -> Option<&str> {
        self.sign_response
            .result
            .as_ref()
            .and_then(|r| r.major.as_deref())
    }

    pub fn result_minor(&self) -> Option<&str> {
        self.sign_response
            .result
            .as_ref()
            .and_then(|r| r.minor.as_deref())
    }

    pub fn result_message_text(&self) -> Option<&str> {
        self.sign_response
            .result
            .as_ref()
            .and_then(|r| r.message.as_ref())
            .map(|m| m.text.as_str())
    }

    /// Whether the asynchronous flow is still pending.
    pub fn is_pending(&self) -> bool {
        self.result_major() == Some(ResultMajorCode::PENDING.uri)
    }

    pub fn is_major_success(&self) -> bool {
        self.result_major() == Some(ResultMajorCode::SUCCESS.uri)
    }

    /// Compact result rendering for diagnostics and protocol errors.
    pub fn result_summary(&self) -> String {
        format!(
            "Major=[{}], Minor=[{}], Message=[{}]",
            self.result_major().unwrap_or(""),
            self.result_minor().unwrap_or(""),
            self.result_message_text().unwrap_or(""),
        )
    }

    /// Correlation id for the poll sub-protocol.
    pub fn async_response_id(&self) -> Option<&str> {
        self.sign_response
            .optional_outputs
            .as_ref()
            .and_then(|o| o.async_response_id.as_deref())
    }

    /// Step-up consent URL the user must visit, if the service issued one.
    pub fn consent_url(&self) -> Option<&str> {
        self.sign_response
            .optional_outputs
            .as_ref()
            .and_then(|o| o.step_up_authorisation_info.as_ref())
            .and_then(|info| info.result.as_ref())
            .and_then(|r| r.consent_url.as_deref())
    }

    /// Encoded CRL entries returned for embedding, empty when absent.
    pub fn crl_entries(&self) -> &[String] {
        self.sign_response
            .optional_outputs
            .as_ref()
            .and_then(|o| o.revocation_information.as_ref())
            .and_then(|r| r.crls.as_ref())
            .map(|c| c.crl.as_slice())
            .unwrap_or(&[])
    }

    /// Encoded OCSP entries returned for embedding, empty when absent.
    pub fn ocsp_entries(&self) -> &[String] {
        self.sign_response
            .optional_outputs
            .as_ref()
            .and_then(|o| o.revocation_information.as_ref())
            .and_then(|r| r.ocsps.as_ref())
            .map(|o| o.ocsp.as_slice())
            .unwrap_or(&[])
    }

    /// Signature object of a single-document response.
    pub fn signature_object(&self) -> Option<&SignatureObject> {
        self.sign_response.signature_object.as_ref()
    }

    /// Batched signature entry for the given document id.
    pub fn signature_object_for_document(
        &self,
        document_id: &str,
    ) -> Option<&ExtendedSignatureObject> {
        self.sign_response
            .signature_object
            .as_ref()
            .and_then(|s| s.other.as_ref())
            .and_then(|o| o.signature_objects.as_ref())
            .map(|objects| objects.extended_signature_object.iter())
            .and_then(|mut iter| {
                iter.find(|object| object.which_document.as_deref() == Some(document_id))
            })
    }
}
