//! AIS Sign - Command line signing with the Swisscom All-in Signing Service
//!
//! Hashes the input documents, submits them for signing and writes the
//! returned signatures as detached files next to them. Step-up consent
//! URLs are printed to stdout for the user to open on their phone.
//!
//! Usage:
//!   ais-sign --mode static --claimed-identity ais-90days-trial \
//!     --input contract.pdf --output contract.p7s
//!
//! Environment variables:
//!   AIS_SIGN_URL - Signing endpoint (default: production AIS sign URL)
//!   AIS_PENDING_URL - Polling endpoint (default: production AIS pending URL)
//!   AIS_CLAIMED_IDENTITY - Claimed identity name provisioned by the service
//!   AIS_CLAIMED_IDENTITY_KEY - Optional claimed identity key
//!   AIS_CERT_FILE / AIS_KEY_FILE - Client certificate PEM pair for mutual TLS
//!   AIS_MSISDN - Mobile number for the step-up confirmation

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ais_client::{
    AisClient, AisClientConfig, ConsentObserver, DetachedSignaturePreparer, DigestAlgorithm,
    DocumentSource, RestClient, RestConfig, RevocationInformation, SignatureMode, SignatureOutcome,
    SignatureStandard, SigningIntent, StepUp,
};

#[derive(Parser, Debug)]
#[command(name = "ais-sign")]
#[command(about = "Sign or timestamp documents with the Swisscom All-in Signing Service")]
#[command(version)]
struct Args {
    /// Signature mode: static, on-demand, on-demand-step-up or timestamp
    #[arg(long, env = "AIS_MODE", default_value = "static")]
    mode: SignatureMode,

    /// Input document; repeat for batch signing
    #[arg(long, required = true)]
    input: Vec<PathBuf>,

    /// Output file for the detached signature; one per input, in order
    #[arg(long, required = true)]
    output: Vec<PathBuf>,

    /// Digest algorithm for the document hashes
    #[arg(long, env = "AIS_DIGEST_ALGORITHM", default_value = "sha512")]
    digest_algorithm: DigestAlgorithm,

    /// Claimed identity name provisioned by the service operator
    #[arg(long, env = "AIS_CLAIMED_IDENTITY")]
    claimed_identity: String,

    /// Claimed identity key, appended to the name for content signatures
    #[arg(long, env = "AIS_CLAIMED_IDENTITY_KEY")]
    claimed_identity_key: Option<String>,

    /// Subject distinguished name for on-demand certificate issuance
    #[arg(long, env = "AIS_DISTINGUISHED_NAME")]
    distinguished_name: Option<String>,

    /// Mobile number that receives the step-up confirmation
    #[arg(long, env = "AIS_MSISDN")]
    msisdn: Option<String>,

    /// Language of the step-up confirmation message
    #[arg(long, env = "AIS_STEP_UP_LANGUAGE", default_value = "en")]
    step_up_language: String,

    /// Text shown to the user on the mobile device
    #[arg(
        long,
        env = "AIS_STEP_UP_MESSAGE",
        default_value = "Please confirm the signing of the document"
    )]
    step_up_message: String,

    /// Expected Mobile ID serial number; mismatches abort the signature
    #[arg(long, env = "AIS_SERIAL_NUMBER")]
    serial_number: Option<String>,

    /// Signature standard override (cades, pades, pades-baseline, plain)
    #[arg(long, env = "AIS_SIGNATURE_STANDARD")]
    signature_standard: Option<SignatureStandard>,

    /// Revocation information override (cades, pdf, both, ...)
    #[arg(long, env = "AIS_REVOCATION_INFORMATION")]
    revocation_information: Option<RevocationInformation>,

    /// Request an RFC 3161 timestamp on top of the content signature
    #[arg(long, env = "AIS_ADD_TIMESTAMP", default_value = "false")]
    add_timestamp: bool,

    /// Signing endpoint
    #[arg(
        long,
        env = "AIS_SIGN_URL",
        default_value = "https://ais.swisscom.com/AIS-Server/rs/v1.0/sign"
    )]
    sign_url: String,

    /// Pending-status polling endpoint
    #[arg(
        long,
        env = "AIS_PENDING_URL",
        default_value = "https://ais.swisscom.com/AIS-Server/rs/v1.0/pending"
    )]
    pending_url: String,

    /// Client certificate PEM file for mutual TLS
    #[arg(long, env = "AIS_CERT_FILE")]
    cert_file: Option<PathBuf>,

    /// Private key PEM file matching the client certificate
    #[arg(long, env = "AIS_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "AIS_REQUEST_TIMEOUT_SECS", default_value = "90")]
    request_timeout_secs: u64,

    /// Maximum connections kept to the service
    #[arg(long, env = "AIS_MAX_CONNECTIONS", default_value = "20")]
    max_connections: usize,

    /// Accept any server certificate (test environments only)
    #[arg(long, env = "AIS_SKIP_SERVER_CERTIFICATE_VALIDATION", default_value = "false")]
    skip_server_certificate_validation: bool,

    /// Seconds between status polls while a step-up is pending
    #[arg(long, env = "AIS_POLLING_INTERVAL_SECS", default_value = "10")]
    polling_interval_secs: u64,

    /// Number of polls before the operation counts as timed out
    #[arg(long, env = "AIS_POLLING_ROUNDS", default_value = "10")]
    polling_rounds: u32,
}

/// Prints the consent URL so the user can open it on their mobile device.
struct StdoutConsentObserver;

impl ConsentObserver for StdoutConsentObserver {
    fn consent_url_received(&self, url: &str, _trace_id: &str) {
        println!("Confirm the signature by opening this URL on the mobile device:");
        println!("{url}");
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,ais_client=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments
    let args = Args::parse();

    if args.input.len() != args.output.len() {
        error!(
            "Expected one --output per --input, got {} input(s) and {} output(s)",
            args.input.len(),
            args.output.len()
        );
        std::process::exit(1);
    }

    let documents: Vec<DocumentSource> = args
        .input
        .iter()
        .zip(&args.output)
        .map(|(input, output)| {
            DocumentSource::new(input.clone(), output.clone())
                .with_digest_algorithm(args.digest_algorithm)
        })
        .collect();

    let mut intent = match args.mode {
        SignatureMode::Static => {
            SigningIntent::static_signature(documents, args.claimed_identity.clone())
        }
        SignatureMode::OnDemand => SigningIntent::on_demand(
            documents,
            args.claimed_identity.clone(),
            args.distinguished_name.clone().unwrap_or_default(),
        ),
        SignatureMode::OnDemandStepUp => {
            let mut step_up = StepUp::new(
                args.step_up_language.clone(),
                args.msisdn.clone().unwrap_or_default(),
                args.step_up_message.clone(),
            );
            if let Some(serial) = args.serial_number.clone() {
                step_up = step_up.with_serial_number(serial);
            }
            SigningIntent::on_demand_with_step_up(
                documents,
                args.claimed_identity.clone(),
                args.distinguished_name.clone().unwrap_or_default(),
                step_up,
            )
        }
        SignatureMode::Timestamp => {
            SigningIntent::timestamp(documents, args.claimed_identity.clone())
        }
    };
    if let Some(key) = args.claimed_identity_key.clone() {
        intent = intent.with_claimed_identity_key(key);
    }
    if let Some(standard) = args.signature_standard {
        intent = intent.with_signature_standard(standard);
    }
    if let Some(revocation) = args.revocation_information {
        intent = intent.with_revocation_information(revocation);
    }
    intent = intent.with_add_timestamp(args.add_timestamp);

    let mut rest_config = RestConfig::new(args.sign_url.clone(), args.pending_url.clone())
        .with_request_timeout_secs(args.request_timeout_secs)
        .with_max_connections(args.max_connections)
        .with_skip_server_certificate_validation(args.skip_server_certificate_validation);
    rest_config.client_certificate_file = args.cert_file.clone();
    rest_config.client_key_file = args.key_file.clone();

    let transport = match RestClient::new(rest_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Transport configuration rejected: {e}");
            std::process::exit(1);
        }
    };

    let client_config = AisClientConfig::default()
        .with_polling_interval_secs(args.polling_interval_secs)
        .with_polling_rounds(args.polling_rounds);
    let preparer = Arc::new(DetachedSignaturePreparer::new());
    let client = match AisClient::new(client_config, transport, preparer) {
        Ok(client) => client,
        Err(e) => {
            error!("Client configuration rejected: {e}");
            std::process::exit(1);
        }
    };

    info!(
        "Signing {} document(s) in {} mode (transaction {})",
        intent.documents.len(),
        intent.mode,
        intent.transaction_id
    );

    let observer: Arc<dyn ConsentObserver> = Arc::new(StdoutConsentObserver);
    match client.sign_with_observer(&intent, Some(observer)).await {
        Ok(outcome) => {
            info!("Finished signing the document(s) with the status: {outcome}");
            if outcome != SignatureOutcome::Success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Signing failed: {e}");
            std::process::exit(1);
        }
    }
}
