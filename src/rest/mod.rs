//! REST protocol layer.
//!
//! Result-code catalogs, the JSON wire model, request assembly and the
//! HTTP transport towards the service:
//! - [`codes`] holds the URI catalogs the service answers with
//! - [`model`] mirrors the request and response JSON
//! - [`builder`] assembles requests from a signing intent
//! - [`client`] sends them, [`mock`] replays scripted answers in tests

pub mod builder;
pub mod client;
pub mod codes;
pub mod mock;
pub mod model;

pub use client::{RestClient, SignatureTransport};
pub use mock::MockTransport;
