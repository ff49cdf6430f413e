//! Result code catalogs of the signing protocol.
//!
//! Three independent closed sets of (URI, description) records: major
//! codes classify the round trip, minor codes refine failures, message
//! codes identify specific step-up authentication faults carried in the
//! free-text result message. Lookup is by exact, case-sensitive URI;
//! unknown URIs resolve to `None`. Equality is by URI.

/// Top-level classification of a service response.
#[derive(Debug, Clone, Copy)]
pub struct ResultMajorCode {
    pub uri: &'static str,
    pub description: &'static str,
}

impl ResultMajorCode {
    pub const SUBSYSTEM_ERROR: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultmajor/SubsystemError",
        "Some subsystem of the server produced an error. Details are in the minor status code.",
    );

    pub const PENDING: Self = Self::new(
        "urn:oasis:names:tc:dss:1.0:profiles:asynchronousprocessing:resultmajor:Pending",
        "Asynchronous request was accepted and is pending now.",
    );

    pub const REQUESTER_ERROR: Self = Self::new(
        "urn:oasis:names:tc:dss:1.0:resultmajor:RequesterError",
        "The caller is assumed to have made a mistake. Details are in the minor status code.",
    );

    pub const RESPONDER_ERROR: Self = Self::new(
        "urn:oasis:names:tc:dss:1.0:resultmajor:ResponderError",
        "The server could not process the request. Details are in the minor status code.",
    );

    pub const SUCCESS: Self = Self::new(
        "urn:oasis:names:tc:dss:1.0:resultmajor:Success",
        "Request was successfully executed.",
    );

    pub const ALL: &'static [Self] = &[
        Self::SUBSYSTEM_ERROR,
        Self::PENDING,
        Self::REQUESTER_ERROR,
        Self::RESPONDER_ERROR,
        Self::SUCCESS,
    ];

    const fn new(uri: &'static str, description: &'static str) -> Self {
        Self { uri, description }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.uri == uri)
    }
}

impl PartialEq for ResultMajorCode {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for ResultMajorCode {}

/// Failure detail accompanying a RequesterError, ResponderError, or
/// SubsystemError major code.
#[derive(Debug, Clone, Copy)]
pub struct ResultMinorCode {
    pub uri: &'static str,
    pub description: &'static str,
}

impl ResultMinorCode {
    pub const AUTHENTICATION_FAILED: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/AuthenticationFailed",
        "Request authentication failed, e.g. the customer used an unknown certificate.",
    );

    pub const CANT_SERVE_TIMELY: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/CantServeTimely",
        "The request could not be processed on time. The subsystem might be overloaded.",
    );

    pub const INSUFFICIENT_DATA: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/InsufficientData",
        "The request could not be completed because some information is missing.",
    );

    pub const SERVICE_INACTIVE: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/ServiceInactive",
        "The requested service is inactive or not defined at all.",
    );

    pub const SIGNATURE_ERROR: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/SignatureError",
        "An error occurred while creating a signature.",
    );

    pub const SERIAL_NUMBER_MISMATCH: Self = Self::new(
        "http://ais.swisscom.ch/1.1/resultminor/subsystem/StepUp/SerialNumberMismatch",
        "The serial number provided in the request did not match the user's mobile number.",
    );

    pub const SERVICE_ERROR: Self = Self::new(
        "http://ais.swisscom.ch/1.1/resultminor/subsystem/StepUp/service",
        "A service error occurred during the step-up authentication. \
         Details are in the result message.",
    );

    pub const STEPUP_INVALID_STATUS: Self = Self::new(
        "http://ais.swisscom.ch/1.1/resultminor/subsystem/StepUp/status",
        "The step-up subsystem returned an unknown status code.",
    );

    pub const STEPUP_TIMEOUT: Self = Self::new(
        "http://ais.swisscom.ch/1.1/resultminor/subsystem/StepUp/timeout",
        "The transaction expired before the step-up authorisation was completed.",
    );

    pub const STEPUP_CANCEL: Self = Self::new(
        "http://ais.swisscom.ch/1.1/resultminor/subsystem/StepUp/cancel",
        "The user cancelled the step-up authorisation.",
    );

    pub const TIMESTAMP_ERROR: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/TimestampError",
        "An error occurred while creating a timestamp.",
    );

    pub const UNEXPECTED_DATA: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/UnexpectedData",
        "The request contains unexpected (wrong or misleading) data.",
    );

    pub const UNKNOWN_CUSTOMER: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/UnknownCustomer",
        "The customer is unknown.",
    );

    pub const UNKNOWN_SERVICE_ENTITY: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/UnknownServiceEntity",
        "The service entity (static key pair or on-demand CA server) could not be found.",
    );

    pub const UNSUPPORTED_DIGEST_ALGORITHM: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/UnsupportedDigestAlgorithm",
        "The request contains a document hashed with an unsupported or weak digest algorithm.",
    );

    pub const UNSUPPORTED_PROFILE: Self = Self::new(
        "http://ais.swisscom.ch/1.0/resultminor/UnsupportedProfile",
        "The request contained an unknown profile URI.",
    );

    // The colon before "subsystem" is how the service spells this URI.
    pub const STEPUP_TRANSPORT_ERROR: Self = Self::new(
        "http://ais.swisscom.ch/1.1/resultminor:subsystem/StepUp/transport",
        "A subsystem transport error occurred.",
    );

    pub const GENERAL_ERROR: Self = Self::new(
        "urn:oasis:names:tc:dss:1.0:resultminor:GeneralError",
        "A general internal error occurred.",
    );

    pub const ALL: &'static [Self] = &[
        Self::AUTHENTICATION_FAILED,
        Self::CANT_SERVE_TIMELY,
        Self::INSUFFICIENT_DATA,
        Self::SERVICE_INACTIVE,
        Self::SIGNATURE_ERROR,
        Self::SERIAL_NUMBER_MISMATCH,
        Self::SERVICE_ERROR,
        Self::STEPUP_INVALID_STATUS,
        Self::STEPUP_TIMEOUT,
        Self::STEPUP_CANCEL,
        Self::TIMESTAMP_ERROR,
        Self::UNEXPECTED_DATA,
        Self::UNKNOWN_CUSTOMER,
        Self::UNKNOWN_SERVICE_ENTITY,
        Self::UNSUPPORTED_DIGEST_ALGORITHM,
        Self::UNSUPPORTED_PROFILE,
        Self::STEPUP_TRANSPORT_ERROR,
        Self::GENERAL_ERROR,
    ];

    const fn new(uri: &'static str, description: &'static str) -> Self {
        Self { uri, description }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.uri == uri)
    }
}

impl PartialEq for ResultMinorCode {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for ResultMinorCode {}

/// Specific fault identifier carried in the result message text during
/// the step-up phase.
#[derive(Debug, Clone, Copy)]
pub struct ResultMessageCode {
    pub uri: &'static str,
    pub description: &'static str,
}

impl ResultMessageCode {
    pub const INVALID_PASSWORD: Self = Self::new(
        "urn:swisscom:names:sas:1.0:status:InvalidPassword",
        "User entered an invalid password during the step-up phase.",
    );

    pub const INVALID_OTP: Self = Self::new(
        "urn:swisscom:names:sas:1.0:status:InvalidOtp",
        "User entered an invalid OTP during the step-up phase.",
    );

    pub const ALL: &'static [Self] = &[Self::INVALID_PASSWORD, Self::INVALID_OTP];

    const fn new(uri: &'static str, description: &'static str) -> Self {
        Self { uri, description }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.uri == uri)
    }
}

impl PartialEq for ResultMessageCode {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for ResultMessageCode {}
