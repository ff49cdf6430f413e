//! Terminal caller-facing outcome of one signing operation.

use std::fmt;

/// Result of a signing operation. Exactly one outcome is produced per
/// intent; conditions outside this set surface as errors instead.
///
/// The non-success variants are expected user journeys, not faults: the
/// user let the consent window lapse, declined, presented the wrong
/// device, or could not be identified. They are returned, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureOutcome {
    /// The signature(s) were produced and embedded.
    Success,
    /// The user did not confirm within the polling window, or the step-up
    /// service reported a timeout.
    UserTimeout,
    /// The user cancelled the step-up confirmation.
    UserCancel,
    /// The mobile device serial number did not match the expected one.
    SerialNumberMismatch,
    /// The service rejected the request because the MSISDN parameter was
    /// absent on the server side.
    InsufficientDataWithAbsentMsisdn,
    /// The user failed authentication (wrong password or one-time code).
    UserAuthenticationFailed,
}

impl fmt::Display for SignatureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureOutcome::Success => "Success",
            SignatureOutcome::UserTimeout => "UserTimeout",
            SignatureOutcome::UserCancel => "UserCancel",
            SignatureOutcome::SerialNumberMismatch => "SerialNumberMismatch",
            SignatureOutcome::InsufficientDataWithAbsentMsisdn => {
                "InsufficientDataWithAbsentMsisdn"
            }
            SignatureOutcome::UserAuthenticationFailed => "UserAuthenticationFailed",
        };
        f.write_str(name)
    }
}
