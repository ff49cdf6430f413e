//! Data model for signing operations: intents, value catalogs, and the
//! terminal outcome enumeration.

pub mod intent;
pub mod outcome;
pub mod types;

pub use intent::{DocumentSource, SigningIntent, StepUp};
pub use outcome::SignatureOutcome;
pub use types::{
    AdditionalProfile, DigestAlgorithm, RevocationInformation, SignatureMode, SignatureStandard,
    SignatureType,
};
