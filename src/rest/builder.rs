//! Assembly of wire requests from a validated signing intent.

use uuid::Uuid;

use crate::document::PreparedDocument;
use crate::model::{
    AdditionalProfile, RevocationInformation, SignatureMode, SignatureStandard, SignatureType,
    SigningIntent,
};
use crate::rest::model::{
    AddRevocationInformation, AddTimestamp, CertificateRequest, ClaimedIdentity, DigestMethod,
    DocumentHash, InputDocuments, OptionalInputs, PendingOptionalInputs, PendingRequest,
    PendingRequestEnvelope, Phone, SignRequest, SignRequestEnvelope, StepUpAuthorisation,
};

/// Base profile every submission and poll is issued under.
pub const SWISSCOM_BASIC_PROFILE: &str = "http://ais.swisscom.ch/1.1";

/// Builds the initial signing submission for an intent and its prepared
/// document digests.
pub fn build_sign_request(
    intent: &SigningIntent,
    documents: &[PreparedDocument],
) -> SignRequestEnvelope {
    let document_hash = documents
        .iter()
        .map(|d| DocumentHash {
            id: d.document_id.clone(),
            digest_method: DigestMethod {
                algorithm: d.digest_algorithm.uri().to_string(),
            },
            digest_value: d.digest_base64.clone(),
        })
        .collect();

    let optional_inputs = OptionalInputs {
        add_timestamp: intent.add_timestamp.then(|| AddTimestamp {
            timestamp_type: SignatureType::Timestamp.uri().to_string(),
        }),
        additional_profile: assemble_profiles(intent.mode, documents.len()),
        claimed_identity: ClaimedIdentity {
            name: claimed_identity_name(intent),
        },
        signature_type: intent.signature_type().uri().to_string(),
        add_revocation_information: revocation_input(intent),
        signature_standard: signature_standard_input(intent),
        certificate_request: certificate_request_input(intent),
    };

    SignRequestEnvelope {
        sign_request: SignRequest {
            request_id: generate_request_id(),
            profile: SWISSCOM_BASIC_PROFILE.to_string(),
            input_documents: InputDocuments { document_hash },
            optional_inputs,
        },
    }
}

/// Builds the poll request that follows up an asynchronous submission.
pub fn build_pending_request(
    async_response_id: &str,
    intent: &SigningIntent,
) -> PendingRequestEnvelope {
    PendingRequestEnvelope {
        pending_request: PendingRequest {
            profile: SWISSCOM_BASIC_PROFILE.to_string(),
            optional_inputs: PendingOptionalInputs {
                claimed_identity: ClaimedIdentity {
                    name: intent.claimed_identity_name.clone(),
                },
                async_response_id: async_response_id.to_string(),
            },
        },
    }
}

/// Mode profiles, with the batch-processing profile prepended when the
/// submission carries more than one document.
fn assemble_profiles(mode: SignatureMode, document_count: usize) -> Vec<String> {
    let mut profiles = Vec::new();
    if document_count > 1 {
        profiles.push(AdditionalProfile::Batch.uri().to_string());
    }
    profiles.extend(
        mode.additional_profiles()
            .iter()
            .map(|p| p.uri().to_string()),
    );
    profiles
}

/// The claimed identity key selects a signing key of the account and is
/// appended after a colon, except for timestamps which always use the bare
/// account name.
fn claimed_identity_name(intent: &SigningIntent) -> String {
    let mut name = intent.claimed_identity_name.clone();
    if intent.mode != SignatureMode::Timestamp {
        if let Some(key) = intent
            .claimed_identity_key
            .as_deref()
            .filter(|k| !k.is_empty())
        {
            name.push(':');
            name.push_str(key);
        }
    }
    name
}

/// Timestamps always request full revocation data. For the other modes an
/// unset value means the service default, rendered as an absent input.
fn revocation_input(intent: &SigningIntent) -> Option<AddRevocationInformation> {
    match intent.revocation_information {
        Some(revocation) => Some(AddRevocationInformation {
            revocation_type: revocation.value().to_string(),
        }),
        None if intent.mode == SignatureMode::Timestamp => Some(AddRevocationInformation {
            revocation_type: RevocationInformation::Both.value().to_string(),
        }),
        None => None,
    }
}

fn signature_standard_input(intent: &SigningIntent) -> Option<String> {
    if intent.mode == SignatureMode::Timestamp
        || intent.signature_standard == SignatureStandard::Default
    {
        None
    } else {
        Some(intent.signature_standard.value().to_string())
    }
}

fn certificate_request_input(intent: &SigningIntent) -> Option<CertificateRequest> {
    let mut request = intent.with_certificate_request().then(|| CertificateRequest {
        distinguished_name: intent.distinguished_name.clone(),
        step_up_authorisation: None,
    });
    if intent.with_step_up() {
        if let Some(step_up) = &intent.step_up {
            let authorisation = StepUpAuthorisation {
                phone: Phone {
                    language: step_up.language.clone(),
                    msisdn: step_up.msisdn.clone(),
                    message: step_up.message.clone(),
                    serial_number: step_up.serial_number.clone(),
                },
            };
            request = Some(match request {
                Some(mut r) => {
                    r.step_up_authorisation = Some(authorisation);
                    r
                }
                None => CertificateRequest {
                    distinguished_name: None,
                    step_up_authorisation: Some(authorisation),
                },
            });
        }
    }
    request
}

fn generate_request_id() -> String {
    format!("ID-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DigestAlgorithm, DocumentSource, StepUp};

    fn prepared(id: &str) -> PreparedDocument {
        PreparedDocument {
            document_id: id.to_string(),
            digest_algorithm: DigestAlgorithm::Sha512,
            digest_base64: "aGFzaA==".to_string(),
            reserved_size: 30_000,
        }
    }

    fn sources(n: usize) -> Vec<DocumentSource> {
        (0..n)
            .map(|i| DocumentSource::new(format!("in-{i}.pdf"), format!("out-{i}.sig")))
            .collect()
    }

    #[test]
    fn static_request_has_no_optional_extras() {
        let intent = SigningIntent::static_signature(sources(1), "alice");
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);
        let request = &envelope.sign_request;

        assert!(request.request_id.starts_with("ID-"));
        assert_eq!(request.profile, SWISSCOM_BASIC_PROFILE);
        assert!(request.optional_inputs.additional_profile.is_empty());
        assert!(request.optional_inputs.add_timestamp.is_none());
        assert!(request.optional_inputs.add_revocation_information.is_none());
        assert!(request.optional_inputs.signature_standard.is_none());
        assert!(request.optional_inputs.certificate_request.is_none());
        assert_eq!(request.optional_inputs.signature_type, "urn:ietf:rfc:3369");
        assert_eq!(request.input_documents.document_hash.len(), 1);
        assert_eq!(request.input_documents.document_hash[0].id, "DOC-1");
        assert_eq!(
            request.input_documents.document_hash[0].digest_method.algorithm,
            "http://www.w3.org/2001/04/xmlenc#sha512"
        );
    }

    #[test]
    fn claimed_identity_key_is_appended_after_a_colon() {
        let intent =
            SigningIntent::static_signature(sources(1), "alice").with_claimed_identity_key("key1");
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);
        assert_eq!(
            envelope.sign_request.optional_inputs.claimed_identity.name,
            "alice:key1"
        );
    }

    #[test]
    fn timestamp_mode_ignores_the_claimed_identity_key() {
        let intent = SigningIntent::timestamp(sources(1), "alice").with_claimed_identity_key("key1");
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);
        assert_eq!(
            envelope.sign_request.optional_inputs.claimed_identity.name,
            "alice"
        );
    }

    #[test]
    fn batch_profile_is_prepended_for_multiple_documents() {
        let intent = SigningIntent::on_demand_with_step_up(
            sources(2),
            "alice",
            "cn=Alice,c=CH",
            StepUp::new("en", "41790000000", "Sign?"),
        );
        let envelope = build_sign_request(&intent, &[prepared("DOC-1"), prepared("DOC-2")]);

        assert_eq!(
            envelope.sign_request.optional_inputs.additional_profile,
            vec![
                "http://ais.swisscom.ch/1.0/profiles/batchprocessing",
                "http://ais.swisscom.ch/1.0/profiles/ondemandcertificate",
                "http://ais.swisscom.ch/1.1/profiles/redirect",
                "urn:oasis:names:tc:dss:1.0:profiles:asynchronousprocessing",
            ]
        );
    }

    #[test]
    fn step_up_details_are_carried_in_the_certificate_request() {
        let intent = SigningIntent::on_demand_with_step_up(
            sources(1),
            "alice",
            "cn=Alice,c=CH",
            StepUp::new("en", "41790000000", "Sign?").with_serial_number("SN-1"),
        );
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);

        let request = envelope
            .sign_request
            .optional_inputs
            .certificate_request
            .unwrap();
        assert_eq!(request.distinguished_name.as_deref(), Some("cn=Alice,c=CH"));
        let phone = request.step_up_authorisation.unwrap().phone;
        assert_eq!(phone.language, "en");
        assert_eq!(phone.msisdn, "41790000000");
        assert_eq!(phone.message, "Sign?");
        assert_eq!(phone.serial_number.as_deref(), Some("SN-1"));
    }

    #[test]
    fn on_demand_without_step_up_omits_the_authorisation() {
        let intent = SigningIntent::on_demand(sources(1), "alice", "cn=Alice,c=CH");
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);

        let request = envelope
            .sign_request
            .optional_inputs
            .certificate_request
            .unwrap();
        assert!(request.step_up_authorisation.is_none());
        assert_eq!(
            envelope.sign_request.optional_inputs.additional_profile,
            vec!["http://ais.swisscom.ch/1.0/profiles/ondemandcertificate"]
        );
    }

    #[test]
    fn timestamp_mode_defaults_revocation_to_both() {
        let intent = SigningIntent::timestamp(sources(1), "alice");
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);

        let inputs = &envelope.sign_request.optional_inputs;
        assert_eq!(inputs.signature_type, "urn:ietf:rfc:3161");
        assert_eq!(
            inputs
                .add_revocation_information
                .as_ref()
                .map(|r| r.revocation_type.as_str()),
            Some("BOTH")
        );
        assert_eq!(
            inputs.additional_profile,
            vec!["urn:oasis:names:tc:dss:1.0:profiles:timestamping"]
        );
    }

    #[test]
    fn explicit_revocation_choice_is_forwarded() {
        let intent = SigningIntent::static_signature(sources(1), "alice")
            .with_revocation_information(RevocationInformation::Pdf);
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);
        assert_eq!(
            envelope
                .sign_request
                .optional_inputs
                .add_revocation_information
                .map(|r| r.revocation_type),
            Some("PDF".to_string())
        );
    }

    #[test]
    fn signature_standard_is_skipped_for_timestamps_and_default() {
        let with_standard = SigningIntent::static_signature(sources(1), "alice")
            .with_signature_standard(SignatureStandard::PadesBaseline);
        let envelope = build_sign_request(&with_standard, &[prepared("DOC-1")]);
        assert_eq!(
            envelope.sign_request.optional_inputs.signature_standard,
            Some("PAdES-baseline".to_string())
        );

        let defaulted = SigningIntent::static_signature(sources(1), "alice");
        let envelope = build_sign_request(&defaulted, &[prepared("DOC-1")]);
        assert!(envelope.sign_request.optional_inputs.signature_standard.is_none());

        let timestamp = SigningIntent::timestamp(sources(1), "alice")
            .with_signature_standard(SignatureStandard::PadesBaseline);
        let envelope = build_sign_request(&timestamp, &[prepared("DOC-1")]);
        assert!(envelope.sign_request.optional_inputs.signature_standard.is_none());
    }

    #[test]
    fn add_timestamp_flag_requests_an_rfc3161_token() {
        let intent = SigningIntent::static_signature(sources(1), "alice").with_add_timestamp(true);
        let envelope = build_sign_request(&intent, &[prepared("DOC-1")]);
        assert_eq!(
            envelope
                .sign_request
                .optional_inputs
                .add_timestamp
                .map(|t| t.timestamp_type),
            Some("urn:ietf:rfc:3161".to_string())
        );
    }

    #[test]
    fn request_ids_are_unique() {
        let intent = SigningIntent::static_signature(sources(1), "alice");
        let first = build_sign_request(&intent, &[prepared("DOC-1")]);
        let second = build_sign_request(&intent, &[prepared("DOC-1")]);
        assert_ne!(
            first.sign_request.request_id,
            second.sign_request.request_id
        );
    }

    #[test]
    fn pending_request_reuses_the_bare_identity_name() {
        let intent = SigningIntent::on_demand_with_step_up(
            sources(1),
            "alice",
            "cn=Alice,c=CH",
            StepUp::new("en", "41790000000", "Sign?"),
        )
        .with_claimed_identity_key("key1");
        let envelope = build_pending_request("resp-42", &intent);

        let pending = &envelope.pending_request;
        assert_eq!(pending.profile, SWISSCOM_BASIC_PROFILE);
        assert_eq!(pending.optional_inputs.claimed_identity.name, "alice");
        assert_eq!(pending.optional_inputs.async_response_id, "resp-42");
    }
}
